//! Core logic for accessible navigation: polyline decoding, hazard lookup
//! along routes, and directions request fingerprints.

pub mod directions;
pub mod enrichment;
pub mod models;
pub mod polyline;
pub mod spatial;

pub use directions::{
    CacheKey, DirectionsParams, DirectionsRequest, DirectionsResponse, DirectionsResult,
    RequestError, RoutePreferences, RouteRequestBody,
};
pub use enrichment::{EnrichmentConfig, PointStore, RouteEnricher, StoreError};
pub use models::{
    AccessibilityPoint, Coordinate, CreatePointRequest, HazardPoint, HazardType, Location,
    MobilityProfile, PointStatus, SavedRoute, SavedRouteSummary, TravelMode, UserPreferences,
};
pub use polyline::DecodeError;
pub use spatial::haversine_distance;
