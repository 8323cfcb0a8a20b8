//! Parsing of command line locations.

use accessnav_core::Coordinate;
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

/// Parse `"lat,lng"` into a validated coordinate.
pub fn parse_coordinate(raw: &str) -> Result<Coordinate> {
    let (lat, lng) = raw
        .split_once(',')
        .with_context(|| format!("expected 'lat,lng', got '{}'", raw))?;
    let coord = Coordinate::new(
        lat.trim().parse().with_context(|| format!("bad latitude in '{}'", raw))?,
        lng.trim().parse().with_context(|| format!("bad longitude in '{}'", raw))?,
    );
    if !coord.is_valid() {
        bail!("coordinate '{}' is out of range", raw);
    }
    Ok(coord)
}

/// Route endpoint as sent to the server: coordinates when the argument
/// parses as `lat,lng`, otherwise a free-form address.
pub fn location_value(raw: &str) -> Value {
    match parse_coordinate(raw) {
        Ok(coord) => json!({ "lat": coord.lat, "lng": coord.lng }),
        Err(_) => Value::String(raw.trim().to_string()),
    }
}
