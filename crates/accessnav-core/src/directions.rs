//! Directions request/response types, validation and cache fingerprints.

use crate::models::{Coordinate, HazardPoint, Location, TravelMode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use thiserror::Error;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Origin and destination are required")]
    MissingEndpoints,
    #[error("{field} must be an address string or an object with numeric lat and lng")]
    MalformedLocation { field: &'static str },
    #[error("{field} coordinates are out of range")]
    CoordinateOutOfRange { field: &'static str },
    #[error("{0}")]
    InvalidMode(String),
}

/// Validated route request.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Location,
    pub destination: Location,
    pub mode: TravelMode,
    pub avoid_stairs: bool,
    pub wheelchair_accessible_transit: bool,
}

impl DirectionsRequest {
    /// Request with default accessibility preferences.
    pub fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
            mode: TravelMode::Walking,
            avoid_stairs: true,
            wheelchair_accessible_transit: true,
        }
    }

    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        validate_location(&self.origin, "origin")?;
        validate_location(&self.destination, "destination")
    }
}

fn validate_location(location: &Location, field: &'static str) -> Result<(), RequestError> {
    match location {
        Location::Coordinates(coord) if !coord.is_valid() => {
            Err(RequestError::CoordinateOutOfRange { field })
        }
        Location::Address(address) if address.trim().is_empty() => {
            Err(RequestError::MissingEndpoints)
        }
        _ => Ok(()),
    }
}

/// Route preferences as sent by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_stairs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible_transit: Option<bool>,
}

/// Raw `POST /api/route` body. Endpoints stay untyped until validation so
/// malformed shapes are reported as request errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteRequestBody {
    #[serde(default)]
    pub origin: Option<Value>,
    #[serde(default)]
    pub destination: Option<Value>,
    #[serde(default)]
    pub preferences: Option<RoutePreferences>,
}

impl RouteRequestBody {
    pub fn into_request(self) -> Result<DirectionsRequest, RequestError> {
        let origin = parse_location(self.origin, "origin")?;
        let destination = parse_location(self.destination, "destination")?;
        let preferences = self.preferences.unwrap_or_default();

        let mode = match preferences.mode.as_deref() {
            None => TravelMode::default(),
            Some(raw) => raw.parse().map_err(RequestError::InvalidMode)?,
        };

        let request = DirectionsRequest {
            origin,
            destination,
            mode,
            avoid_stairs: preferences.avoid_stairs.unwrap_or(true),
            wheelchair_accessible_transit: preferences
                .wheelchair_accessible_transit
                .unwrap_or(true),
        };
        request.validate()?;
        Ok(request)
    }
}

fn parse_location(value: Option<Value>, field: &'static str) -> Result<Location, RequestError> {
    match value {
        None | Some(Value::Null) => Err(RequestError::MissingEndpoints),
        Some(Value::String(address)) => {
            let trimmed = address.trim();
            if trimmed.is_empty() {
                Err(RequestError::MissingEndpoints)
            } else {
                Ok(Location::Address(trimmed.to_string()))
            }
        }
        Some(Value::Object(map)) => {
            let lat = map.get("lat").and_then(Value::as_f64);
            let lng = map.get("lng").and_then(Value::as_f64);
            match (lat, lng) {
                (Some(lat), Some(lng)) => Ok(Location::Coordinates(Coordinate::new(lat, lng))),
                _ => Err(RequestError::MalformedLocation { field }),
            }
        }
        Some(_) => Err(RequestError::MalformedLocation { field }),
    }
}

/// Parameters sent to the directions provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsParams {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
    pub avoid: Option<String>,
    pub transit_mode: Option<String>,
}

impl DirectionsParams {
    /// Provider parameters with accessibility hints applied.
    pub fn from_request(request: &DirectionsRequest) -> Self {
        let avoid = (request.mode == TravelMode::Walking && request.avoid_stairs)
            .then(|| "stairs".to_string());
        let transit_mode = (request.mode == TravelMode::Transit
            && request.wheelchair_accessible_transit)
            .then(|| "wheelchair".to_string());
        Self {
            origin: request.origin.to_param(),
            destination: request.destination.to_param(),
            mode: request.mode,
            avoid,
            transit_mode,
        }
    }

    /// Query-string pairs, excluding credentials.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("origin", self.origin.clone()),
            ("destination", self.destination.clone()),
            ("mode", self.mode.as_str().to_string()),
        ];
        if let Some(avoid) = &self.avoid {
            pairs.push(("avoid", avoid.clone()));
        }
        if let Some(transit_mode) = &self.transit_mode {
            pairs.push(("transit_mode", transit_mode.clone()));
        }
        pairs
    }
}

/// Deterministic fingerprint of the logical request fields.
///
/// The key is the compact JSON encoding of a fixed-order array, so strings
/// are escaped and coordinates stay distinguishable from addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_request(request: &DirectionsRequest) -> Self {
        let fingerprint = json!([
            location_fingerprint(&request.origin),
            location_fingerprint(&request.destination),
            request.avoid_stairs,
            request.wheelchair_accessible_transit,
            request.mode.as_str(),
        ]);
        Self(fingerprint.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn location_fingerprint(location: &Location) -> Value {
    match location {
        Location::Coordinates(coord) => json!({
            "lat": canonical_degrees(coord.lat),
            "lng": canonical_degrees(coord.lng),
        }),
        Location::Address(address) => Value::String(address.trim().to_string()),
    }
}

// -0.0 and 0.0 name the same place.
fn canonical_degrees(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Provider directions document.
///
/// Only the fields the pipeline inspects are typed; everything else is kept
/// verbatim so responses pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResult {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DirectionsResult {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Encoded overview path of the primary route, if any.
    pub fn overview_polyline(&self) -> Option<&str> {
        self.routes
            .first()?
            .get("overview_polyline")?
            .get("points")?
            .as_str()
            .filter(|points| !points.is_empty())
    }
}

/// Provider document plus hazards found along the primary route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    #[serde(flatten)]
    pub result: DirectionsResult,
    #[serde(default)]
    pub custom_accessibility_warnings: Vec<HazardPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(value: Value) -> RouteRequestBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn body_defaults_to_accessible_walking() {
        let request = body(json!({
            "origin": {"lat": 40.0, "lng": -73.0},
            "destination": "Grand Central Terminal"
        }))
        .into_request()
        .unwrap();

        assert_eq!(request.mode, TravelMode::Walking);
        assert!(request.avoid_stairs);
        assert!(request.wheelchair_accessible_transit);
        assert_eq!(
            request.destination,
            Location::Address("Grand Central Terminal".to_string())
        );
    }

    #[test]
    fn body_rejects_missing_or_malformed_endpoints() {
        let missing = body(json!({"origin": "A"})).into_request();
        assert_eq!(missing, Err(RequestError::MissingEndpoints));

        let blank = body(json!({"origin": "  ", "destination": "B"})).into_request();
        assert_eq!(blank, Err(RequestError::MissingEndpoints));

        let numeric = body(json!({"origin": 42, "destination": "B"})).into_request();
        assert_eq!(
            numeric,
            Err(RequestError::MalformedLocation { field: "origin" })
        );

        let partial = body(json!({"origin": "A", "destination": {"lat": 1.0}})).into_request();
        assert_eq!(
            partial,
            Err(RequestError::MalformedLocation { field: "destination" })
        );

        let out_of_range =
            body(json!({"origin": {"lat": 91.0, "lng": 0.0}, "destination": "B"})).into_request();
        assert_eq!(
            out_of_range,
            Err(RequestError::CoordinateOutOfRange { field: "origin" })
        );
    }

    #[test]
    fn body_rejects_unknown_mode() {
        let result = body(json!({
            "origin": "A",
            "destination": "B",
            "preferences": {"mode": "flying"}
        }))
        .into_request();
        assert!(matches!(result, Err(RequestError::InvalidMode(_))));
    }

    #[test]
    fn params_apply_accessibility_hints() {
        let walking = DirectionsRequest::new(
            Location::Coordinates(Coordinate::new(40.0, -73.0)),
            Location::Address("Pier 17".to_string()),
        );
        let params = DirectionsParams::from_request(&walking);
        assert_eq!(params.origin, "40,-73");
        assert_eq!(params.avoid.as_deref(), Some("stairs"));
        assert_eq!(params.transit_mode, None);

        let transit = walking.clone().with_mode(TravelMode::Transit);
        let params = DirectionsParams::from_request(&transit);
        assert_eq!(params.avoid, None);
        assert_eq!(params.transit_mode.as_deref(), Some("wheelchair"));

        let mut no_hints = walking.with_mode(TravelMode::Driving);
        no_hints.avoid_stairs = true;
        let params = DirectionsParams::from_request(&no_hints);
        assert_eq!(params.avoid, None);
        assert_eq!(params.transit_mode, None);
        assert_eq!(params.query_pairs().len(), 3);
    }

    #[test]
    fn cache_key_is_deterministic() {
        let a = DirectionsRequest::new(
            Location::Coordinates(Coordinate::new(40.0, -73.0)),
            Location::Coordinates(Coordinate::new(40.1, -73.1)),
        );
        let b = a.clone();
        assert_eq!(CacheKey::for_request(&a), CacheKey::for_request(&b));

        let mut c = a.clone();
        c.avoid_stairs = false;
        assert_ne!(CacheKey::for_request(&a), CacheKey::for_request(&c));

        let d = a.clone().with_mode(TravelMode::Transit);
        assert_ne!(CacheKey::for_request(&a), CacheKey::for_request(&d));
    }

    #[test]
    fn cache_key_does_not_alias_separator_addresses() {
        // Naive "{origin}_{destination}" interpolation maps both to "a_b_c".
        let left = DirectionsRequest::new(
            Location::Address("a_b".to_string()),
            Location::Address("c".to_string()),
        );
        let right = DirectionsRequest::new(
            Location::Address("a".to_string()),
            Location::Address("b_c".to_string()),
        );
        assert_ne!(CacheKey::for_request(&left), CacheKey::for_request(&right));

        let quoted = DirectionsRequest::new(
            Location::Address(r#"a","b"#.to_string()),
            Location::Address("c".to_string()),
        );
        assert_ne!(CacheKey::for_request(&quoted), CacheKey::for_request(&left));
    }

    #[test]
    fn cache_key_separates_coordinates_from_addresses() {
        let coords = DirectionsRequest::new(
            Location::Coordinates(Coordinate::new(40.0, -73.0)),
            Location::Address("B".to_string()),
        );
        let text = DirectionsRequest::new(
            Location::Address("40,-73".to_string()),
            Location::Address("B".to_string()),
        );
        assert_ne!(CacheKey::for_request(&coords), CacheKey::for_request(&text));

        let negative_zero = DirectionsRequest::new(
            Location::Coordinates(Coordinate::new(-0.0, 10.0)),
            Location::Address("B".to_string()),
        );
        let zero = DirectionsRequest::new(
            Location::Coordinates(Coordinate::new(0.0, 10.0)),
            Location::Address("B".to_string()),
        );
        assert_eq!(CacheKey::for_request(&negative_zero), CacheKey::for_request(&zero));
    }

    #[test]
    fn result_extracts_primary_overview_path() {
        let result: DirectionsResult = serde_json::from_value(json!({
            "status": "OK",
            "geocoded_waypoints": [],
            "routes": [
                {"overview_polyline": {"points": "_p~iF~ps|U"}, "summary": "first"},
                {"overview_polyline": {"points": "??"}}
            ]
        }))
        .unwrap();
        assert!(result.is_ok());
        assert_eq!(result.overview_polyline(), Some("_p~iF~ps|U"));
        assert!(result.extra.contains_key("geocoded_waypoints"));

        let empty: DirectionsResult =
            serde_json::from_value(json!({"status": "OK", "routes": []})).unwrap();
        assert_eq!(empty.overview_polyline(), None);
    }

    #[test]
    fn response_keeps_provider_fields_and_adds_warnings() {
        let result: DirectionsResult = serde_json::from_value(json!({
            "status": "OK",
            "routes": [],
            "geocoded_waypoints": [{"place_id": "abc"}]
        }))
        .unwrap();
        let response = DirectionsResponse {
            result,
            custom_accessibility_warnings: Vec::new(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "OK");
        assert_eq!(value["geocoded_waypoints"][0]["place_id"], "abc");
        assert_eq!(value["custom_accessibility_warnings"], json!([]));
    }
}
