//! JSON error responses.

use accessnav_core::directions::STATUS_ZERO_RESULTS;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::identity::AuthError;
use crate::route_service::RouteError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Route(err) => match err {
                RouteError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                RouteError::NoRouteFound => StatusCode::NOT_FOUND,
                RouteError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
                RouteError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RouteError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
                RouteError::ProviderNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Route(RouteError::UpstreamError { status, detail }) => json!({
                "error": self.to_string(),
                "status": status,
                "detail": detail,
            }),
            ApiError::Route(RouteError::NoRouteFound) => json!({
                "error": self.to_string(),
                "status": STATUS_ZERO_RESULTS,
            }),
            ApiError::Route(RouteError::UpstreamUnavailable(detail)) => json!({
                "error": "Could not connect to routing service",
                "detail": detail,
            }),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "Request failed");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use accessnav_core::RequestError;

    #[test]
    fn route_errors_map_to_http_status() {
        let cases = [
            (
                RouteError::InvalidRequest(RequestError::MissingEndpoints),
                StatusCode::BAD_REQUEST,
            ),
            (RouteError::NoRouteFound, StatusCode::NOT_FOUND),
            (RouteError::UpstreamTimeout, StatusCode::GATEWAY_TIMEOUT),
            (
                RouteError::UpstreamUnavailable("refused".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RouteError::UpstreamError {
                    status: "REQUEST_DENIED".into(),
                    detail: "bad key".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (RouteError::ProviderNotConfigured, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
