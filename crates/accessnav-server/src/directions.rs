//! Directions provider client.

use accessnav_core::{DirectionsParams, DirectionsResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("directions request timed out")]
    Timeout,
    #[error("directions provider unreachable: {0}")]
    Unavailable(String),
    #[error("directions provider returned an unreadable payload: {0}")]
    InvalidPayload(String),
}

/// External directions capability.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn fetch_directions(
        &self,
        params: &DirectionsParams,
    ) -> Result<DirectionsResult, ProviderError>;
}

/// Google Directions JSON API client.
pub struct GoogleDirectionsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleDirectionsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build directions HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    async fn fetch_directions(
        &self,
        params: &DirectionsParams,
    ) -> Result<DirectionsResult, ProviderError> {
        let mut query = params.query_pairs();
        query.push(("key", self.api_key.clone()));

        tracing::debug!(
            origin = %params.origin,
            destination = %params.destination,
            mode = %params.mode,
            "Requesting directions"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(map_transport_error)?;

        response
            .json::<DirectionsResult>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::InvalidPayload(err.to_string())
                }
            })
    }
}

fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        // Strip the URL: it carries the API key in its query string.
        ProviderError::Unavailable(err.without_url().to_string())
    }
}
