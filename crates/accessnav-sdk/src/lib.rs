//! Accessible navigation SDK
//!
//! Async client for the navigation REST API: enriched directions, saved
//! routes, user preferences and accessibility points.

pub mod client;
pub mod points;
pub mod user;

pub use accessnav_core::{DirectionsResponse, RoutePreferences, RouteRequestBody};
pub use client::{AccessNavClient, ClientError};
pub use points::NearbyPoint;
pub use user::SaveRoute;
