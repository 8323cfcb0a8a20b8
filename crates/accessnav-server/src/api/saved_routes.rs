//! Saved route CRUD for the calling user.

use accessnav_core::models::{SavedRoute, SavedRouteSummary};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiResult};
use crate::persistence::routes;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRouteRequest {
    pub name: Option<String>,
    pub origin: Option<Value>,
    pub destination: Option<Value>,
    pub google_route_data: Option<Value>,
    #[serde(default)]
    pub custom_warnings: Option<Vec<Value>>,
}

fn present(value: &Option<Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
        && !matches!(value, Some(Value::String(s)) if s.trim().is_empty())
}

/// POST /api/routes
pub async fn save_route(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<SaveRouteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) = payload?;

    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let (Some(name), true, true, true) = (
        name,
        present(&body.origin),
        present(&body.destination),
        present(&body.google_route_data),
    ) else {
        return Err(ApiError::BadRequest("Missing required route data".to_string()));
    };

    let route = SavedRoute {
        id: Uuid::new_v4().to_string(),
        user_id,
        name,
        origin: body.origin.unwrap_or_default(),
        destination: body.destination.unwrap_or_default(),
        google_route_data: body.google_route_data.unwrap_or_default(),
        custom_warnings: body.custom_warnings.unwrap_or_default(),
        created_at: Utc::now(),
    };
    routes::insert_route(state.pool(), &route).await?;
    tracing::info!(route_id = %route.id, user_id = %route.user_id, "Saved route");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Route saved successfully",
            "routeId": route.id,
        })),
    ))
}

/// GET /api/routes
pub async fn list_routes(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<SavedRouteSummary>>> {
    let saved = routes::list_routes(state.pool(), &user_id).await?;
    Ok(Json(saved.iter().map(SavedRouteSummary::from).collect()))
}

/// GET /api/routes/:id
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(route_id): Path<String>,
) -> ApiResult<Json<SavedRoute>> {
    let route_id = parse_route_id(&route_id)?;
    routes::get_route(state.pool(), &user_id, &route_id)
        .await?
        .map(Json)
        .ok_or_else(route_not_found)
}

/// DELETE /api/routes/:id
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(route_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let route_id = parse_route_id(&route_id)?;
    if routes::delete_route(state.pool(), &user_id, &route_id).await? {
        tracing::info!(route_id = %route_id, user_id = %user_id, "Deleted saved route");
        Ok(Json(json!({ "message": "Route deleted successfully" })))
    } else {
        Err(route_not_found())
    }
}

fn parse_route_id(raw: &str) -> ApiResult<String> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| ApiError::BadRequest("Invalid route ID format".to_string()))
}

fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found or access denied".to_string())
}
