//! Great-circle distance and search-window math for proximity queries.

use crate::models::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters (Haversine formula).
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance between two coordinates in meters.
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_distance(a.lat, a.lng, b.lat, b.lng)
}

/// Lat/lng rectangle guaranteed to contain every point within a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    #[cfg(test)]
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

/// Search window around `center` covering a circle of `radius_m`.
///
/// Falls back to the full longitude range when the circle reaches a pole or
/// crosses the antimeridian, so the box is always a superset of the circle.
pub fn bounding_box(center: &Coordinate, radius_m: f64) -> BoundingBox {
    let radius_m = radius_m.max(0.0);
    let angular = radius_m / EARTH_RADIUS_M;
    let dlat = angular.to_degrees();

    let min_lat = center.lat - dlat;
    let max_lat = center.lat + dlat;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            min_lng: -180.0,
            max_lng: 180.0,
        };
    }

    let ratio = angular.sin() / center.lat.to_radians().cos();
    if !ratio.is_finite() || ratio >= 1.0 {
        return BoundingBox {
            min_lat,
            max_lat,
            min_lng: -180.0,
            max_lng: 180.0,
        };
    }

    let dlng = ratio.asin().to_degrees();
    let min_lng = center.lng - dlng;
    let max_lng = center.lng + dlng;
    if min_lng < -180.0 || max_lng > 180.0 {
        return BoundingBox {
            min_lat,
            max_lat,
            min_lng: -180.0,
            max_lng: 180.0,
        };
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    }
}
