//! Accessibility point submission and lookup.

use accessnav_core::models::{
    AccessibilityPoint, Coordinate, CreatePointRequest, HazardPoint, HazardType, PointStatus,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiResult};
use crate::persistence::points;
use crate::state::AppState;

pub const DEFAULT_SEARCH_RADIUS_M: f64 = 500.0;
pub const MAX_SEARCH_RADIUS_M: f64 = 5_000.0;

/// POST /api/accessibility-points
pub async fn create_point(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreatePointRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) = payload?;

    let location = Coordinate::new(body.lat, body.lng);
    if !location.is_valid() {
        return Err(ApiError::BadRequest("Coordinates are out of range".to_string()));
    }
    let hazard_type: HazardType = body.point_type.parse().map_err(ApiError::BadRequest)?;

    let point = AccessibilityPoint {
        hazard: HazardPoint {
            id: Uuid::new_v4().to_string(),
            hazard_type,
            description: body.description.unwrap_or_default().trim().to_string(),
            location,
        },
        status: PointStatus::Unverified,
        image_url: body.image_url.filter(|url| !url.trim().is_empty()),
        source: body
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "user".to_string()),
        submitted_by: Some(user_id),
        created_at: Utc::now(),
    };
    points::insert_point(state.pool(), &point).await?;
    tracing::info!(
        point_id = %point.hazard.id,
        point_type = %point.hazard.hazard_type,
        "Accessibility point submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Accessibility point submitted",
            "pointId": point.hazard.id,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
    #[serde(rename = "type")]
    pub point_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPoint {
    #[serde(flatten)]
    pub point: AccessibilityPoint,
    pub distance_m: f64,
}

/// GET /api/accessibility-points?lat&lng&radius&type
pub async fn find_points(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<NearbyPoint>>> {
    let Query(query) = query?;

    let center = Coordinate::new(query.lat, query.lng);
    if !center.is_valid() {
        return Err(ApiError::BadRequest("Coordinates are out of range".to_string()));
    }
    let radius = query.radius.unwrap_or(DEFAULT_SEARCH_RADIUS_M);
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ApiError::BadRequest("radius must be positive".to_string()));
    }
    let radius = radius.min(MAX_SEARCH_RADIUS_M);
    let point_type = query
        .point_type
        .as_deref()
        .map(str::parse::<HazardType>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let found = points::find_points_near(state.pool(), &center, radius, point_type).await?;
    Ok(Json(
        found
            .into_iter()
            .map(|(point, distance_m)| NearbyPoint { point, distance_m })
            .collect(),
    ))
}

/// GET /api/accessibility-points/:id
pub async fn get_point(
    State(state): State<Arc<AppState>>,
    Path(point_id): Path<String>,
) -> ApiResult<Json<AccessibilityPoint>> {
    points::get_point(state.pool(), &point_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Accessibility point not found".to_string()))
}
