//! Encoded polyline codec (precision 1e-5).
//!
//! Each point is stored as the delta from the previous one, scaled to integer
//! 1e-5 degree units, zig-zag folded so the sign lives in the lowest bit, and
//! emitted as little-endian 5-bit chunks. Every chunk except the last carries
//! the 0x20 continuation bit and all chunks are offset by 63 into printable
//! ASCII.

use crate::models::Coordinate;
use thiserror::Error;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;
/// Highest shift that still leaves room for a full chunk in an i64.
const MAX_SHIFT: u32 = 55;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
    #[error("polyline ends in the middle of a value at offset {offset}")]
    Truncated { offset: usize },
    #[error("polyline value starting before offset {offset} overflows")]
    Overflow { offset: usize },
    #[error("decoded point #{index} is outside the valid coordinate range")]
    OutOfRange { index: usize },
}

/// Decode an encoded polyline into coordinates.
///
/// An empty string decodes to an empty path.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut offset = 0usize;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut path = Vec::new();

    while offset < bytes.len() {
        lat = lat
            .checked_add(next_value(bytes, &mut offset)?)
            .ok_or(DecodeError::Overflow { offset })?;
        if offset >= bytes.len() {
            return Err(DecodeError::Truncated { offset });
        }
        lng = lng
            .checked_add(next_value(bytes, &mut offset)?)
            .ok_or(DecodeError::Overflow { offset })?;

        let point = Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION);
        if !point.is_valid() {
            return Err(DecodeError::OutOfRange { index: path.len() });
        }
        path.push(point);
    }

    Ok(path)
}

fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(DecodeError::Truncated { offset: *offset });
        };
        if !(ASCII_OFFSET..=126).contains(&byte) {
            return Err(DecodeError::InvalidByte {
                byte,
                offset: *offset,
            });
        }
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { offset: *offset });
        }
        *offset += 1;

        let chunk = i64::from(byte - ASCII_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    if result & 1 != 0 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

/// Encode coordinates as a polyline string.
pub fn encode(path: &[Coordinate]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in path {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= CONTINUATION {
        out.push(char::from(((CONTINUATION | (value & CHUNK_MASK)) as u8) + ASCII_OFFSET));
        value >>= CHUNK_BITS;
    }
    out.push(char::from((value as u8) + ASCII_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_path() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    fn assert_close(a: &[Coordinate], b: &[Coordinate]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x.lat - y.lat).abs() <= 1e-5, "{} vs {}", x.lat, y.lat);
            assert!((x.lng - y.lng).abs() <= 1e-5, "{} vs {}", x.lng, y.lng);
        }
    }

    #[test]
    fn decodes_reference_polyline() {
        let decoded = decode(REFERENCE).unwrap();
        assert_close(&decoded, &reference_path());
    }

    #[test]
    fn encodes_reference_polyline() {
        assert_eq!(encode(&reference_path()), REFERENCE);
    }

    #[test]
    fn empty_input_is_empty_path() {
        assert_eq!(decode("").unwrap(), Vec::new());
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn random_paths_survive_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let len = rng.random_range(1..60);
            let path: Vec<Coordinate> = (0..len)
                .map(|_| {
                    Coordinate::new(
                        rng.random_range(-90.0..=90.0),
                        rng.random_range(-180.0..=180.0),
                    )
                })
                .collect();
            let decoded = decode(&encode(&path)).unwrap();
            assert_close(&decoded, &path);
        }
    }

    #[test]
    fn rejects_bytes_outside_alphabet() {
        let err = decode("_p~iF ps|U").unwrap_err();
        assert_eq!(err, DecodeError::InvalidByte { byte: b' ', offset: 5 });
    }

    #[test]
    fn rejects_truncated_input() {
        // Latitude only, longitude missing.
        assert!(matches!(decode("_p~iF"), Err(DecodeError::Truncated { .. })));
        // Continuation bit set on the final byte.
        assert!(matches!(decode("_p~iF~ps|"), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn rejects_runaway_values() {
        let runaway = "~".repeat(40);
        assert!(matches!(decode(&runaway), Err(DecodeError::Overflow { .. })));
    }

    #[test]
    fn rejects_out_of_range_points() {
        // Each copy adds another 80 degree latitude step.
        let step = encode(&[Coordinate::new(80.0, 0.0)]);
        assert_eq!(
            decode(&step.repeat(2)),
            Err(DecodeError::OutOfRange { index: 1 })
        );
    }
}
