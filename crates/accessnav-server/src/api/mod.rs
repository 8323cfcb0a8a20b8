//! HTTP API for the navigation server.

pub mod auth;
pub mod error;
pub mod navigation;
pub mod points;
pub mod preferences;
pub mod request_id;
mod routes;
pub mod saved_routes;

use crate::config::Config;
use axum::Router;

pub fn routes(config: &Config) -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router(config)
}
