//! REST API routes.

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::auth::{self, RateLimiter};
use crate::api::{navigation, points, preferences, saved_routes};
use crate::config::Config;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    let route_limiter = RateLimiter::new(
        config.route_rate_limit_rps,
        config.rate_limit_enabled,
        config.trust_proxy,
        config.rate_limit_max_tracked_ips,
    );

    let public_routes = Router::new()
        .route("/", get(welcome))
        .route("/health", get(|| async { "OK" }))
        .route("/api/route/cache", get(navigation::cache_stats))
        .route("/api/accessibility-points/:id", get(points::get_point));

    // Handlers here resolve the caller through the `AuthUser` extractor;
    // searching points is open to anonymous callers.
    let user_routes = Router::new()
        .route(
            "/api/routes",
            post(saved_routes::save_route).get(saved_routes::list_routes),
        )
        .route(
            "/api/routes/:id",
            get(saved_routes::get_route).delete(saved_routes::delete_route),
        )
        .route(
            "/api/user/preferences",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
        .route(
            "/api/accessibility-points",
            get(points::find_points).post(points::create_point),
        );

    // Each route call may hit the paid directions API.
    let navigation_routes = Router::new()
        .route("/api/route", post(navigation::compute_route))
        .layer(middleware::from_fn_with_state(route_limiter, auth::rate_limit));

    public_routes
        .merge(user_routes)
        .merge(navigation_routes)
        .fallback(not_found)
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Accessible Navigation API" }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not Found" })),
    )
}
