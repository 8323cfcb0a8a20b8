//! Route computation endpoints.

use accessnav_core::RouteRequestBody;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::{ApiResult, ApiError};
use crate::route_service::RouteError;
use crate::state::AppState;

/// POST /api/route
pub async fn compute_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequestBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;
    let request = body.into_request().map_err(RouteError::from)?;

    tracing::info!(
        origin = %request.origin.to_param(),
        destination = %request.destination.to_param(),
        mode = %request.mode,
        "Route request"
    );

    let response = state.routes().compute_route(request).await.map_err(ApiError::from)?;
    Ok(Json(response.as_ref()).into_response())
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
}

/// GET /api/route/cache
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    let cache = state.routes().cache();
    Json(CacheStats {
        size: cache.len(),
        capacity: cache.capacity(),
    })
}
