//! HTTP client for the accessible navigation server.

use accessnav_core::{DirectionsResponse, RouteRequestBody};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    detail: Option<String>,
}

/// Client for the navigation API.
pub struct AccessNavClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
    pub(crate) client: reqwest::Client,
}

impl AccessNavClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Bearer token sent with every request (servers running with a JWT secret).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode a JSON body, mapping non-2xx replies to [`ClientError::Api`].
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                error,
                detail: Some(detail),
            }) => format!("{} ({})", error, detail),
            Ok(ErrorBody { error, .. }) => error,
            Err(_) => text,
        };
        tracing::debug!(status = status.as_u16(), message = %message, "API request failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Check server liveness.
    pub async fn health(&self) -> Result<bool> {
        let response = self.client.get(self.url("/health")).send().await?;
        Ok(response.status().is_success())
    }

    /// Directions with accessibility warnings along the route.
    pub async fn compute_route(&self, request: &RouteRequestBody) -> Result<DirectionsResponse> {
        let builder = self.client.post(self.url("/api/route")).json(request);
        self.send_json(builder).await
    }
}
