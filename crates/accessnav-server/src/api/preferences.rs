//! User preference endpoints.

use accessnav_core::models::{MobilityProfile, UserPreferences};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiResult};
use crate::persistence::preferences;
use crate::state::AppState;

/// GET /api/user/preferences
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserPreferences>> {
    Ok(Json(preferences::get_preferences(state.pool(), &user_id).await?))
}

/// PUT /api/user/preferences
///
/// Only `defaultMobility` and `voiceURI` are honored; an explicit
/// `"voiceURI": null` clears the stored voice.
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<UserPreferences>> {
    let Json(body) = payload?;
    let Value::Object(fields) = body else {
        return Err(ApiError::BadRequest("Request body required".to_string()));
    };

    let default_mobility = match fields.get("defaultMobility") {
        None => None,
        Some(Value::String(raw)) => Some(
            raw.parse::<MobilityProfile>()
                .map_err(|_| ApiError::BadRequest("Invalid defaultMobility".to_string()))?,
        ),
        Some(_) => return Err(ApiError::BadRequest("Invalid defaultMobility".to_string())),
    };

    let voice_uri = match fields.get("voiceURI") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(uri)) => Some(Some(uri.clone())),
        Some(_) => return Err(ApiError::BadRequest("Invalid voiceURI".to_string())),
    };

    if default_mobility.is_none() && voice_uri.is_none() {
        return Err(ApiError::BadRequest(
            "No valid preference fields provided".to_string(),
        ));
    }

    let updated =
        preferences::update_preferences(state.pool(), &user_id, default_mobility, voice_uri)
            .await?;
    Ok(Json(updated))
}
