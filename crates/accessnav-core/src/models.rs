//! Core data models for the accessible navigation system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the geographic range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Route endpoint: either explicit coordinates or a free-form address the
/// directions provider geocodes itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates(Coordinate),
    Address(String),
}

impl Location {
    /// Parameter form understood by the directions provider.
    pub fn to_param(&self) -> String {
        match self {
            Location::Coordinates(coord) => coord.to_string(),
            Location::Address(address) => address.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Transit,
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
            TravelMode::Driving => "driving",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(TravelMode::Walking),
            "transit" => Ok(TravelMode::Transit),
            "driving" => Ok(TravelMode::Driving),
            other => Err(format!("unsupported travel mode '{}'", other)),
        }
    }
}

/// Kind of accessibility feature or obstacle reported by users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    Ramp,
    Elevator,
    Hazard,
    AccessibleRestroom,
    MissingCurbCut,
    StepFreeEntrance,
}

impl HazardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardType::Ramp => "ramp",
            HazardType::Elevator => "elevator",
            HazardType::Hazard => "hazard",
            HazardType::AccessibleRestroom => "accessible_restroom",
            HazardType::MissingCurbCut => "missing_curb_cut",
            HazardType::StepFreeEntrance => "step_free_entrance",
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ramp" => Ok(HazardType::Ramp),
            "elevator" => Ok(HazardType::Elevator),
            "hazard" => Ok(HazardType::Hazard),
            "accessible_restroom" => Ok(HazardType::AccessibleRestroom),
            "missing_curb_cut" => Ok(HazardType::MissingCurbCut),
            "step_free_entrance" => Ok(HazardType::StepFreeEntrance),
            other => Err(format!("unknown accessibility point type '{}'", other)),
        }
    }
}

/// Hazard record attached to enriched directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardPoint {
    pub id: String,
    #[serde(rename = "type")]
    pub hazard_type: HazardType,
    pub description: String,
    pub location: Coordinate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStatus {
    /// Newly submitted, not yet reviewed
    #[default]
    Unverified,
    Verified,
}

impl PointStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointStatus::Unverified => "unverified",
            PointStatus::Verified => "verified",
        }
    }
}

impl FromStr for PointStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unverified" => Ok(PointStatus::Unverified),
            "verified" => Ok(PointStatus::Verified),
            other => Err(format!("unknown point status '{}'", other)),
        }
    }
}

/// Stored accessibility point with submission metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityPoint {
    #[serde(flatten)]
    pub hazard: HazardPoint,
    pub status: PointStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to submit a new accessibility point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub point_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MobilityProfile {
    #[default]
    Standard,
    Wheelchair,
}

impl MobilityProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            MobilityProfile::Standard => "standard",
            MobilityProfile::Wheelchair => "wheelchair",
        }
    }
}

impl FromStr for MobilityProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(MobilityProfile::Standard),
            "wheelchair" => Ok(MobilityProfile::Wheelchair),
            other => Err(format!("invalid defaultMobility '{}'", other)),
        }
    }
}

/// Per-user mobility preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(rename = "defaultMobility")]
    pub default_mobility: MobilityProfile,
    #[serde(rename = "voiceURI")]
    pub voice_uri: Option<String>,
}

/// A route saved by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoute {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub origin: serde_json::Value,
    pub destination: serde_json::Value,
    pub google_route_data: serde_json::Value,
    pub custom_warnings: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Listing view of a saved route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRouteSummary {
    pub id: String,
    pub name: String,
    pub origin: serde_json::Value,
    pub destination: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<&SavedRoute> for SavedRouteSummary {
    fn from(route: &SavedRoute) -> Self {
        Self {
            id: route.id.clone(),
            name: route.name.clone(),
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            created_at: route.created_at,
        }
    }
}
