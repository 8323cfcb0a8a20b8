//! Directions orchestration: cache lookup, provider call, hazard enrichment.

use accessnav_core::directions::{STATUS_OK, STATUS_ZERO_RESULTS};
use accessnav_core::{
    polyline, CacheKey, DirectionsParams, DirectionsRequest, DirectionsResponse,
    DirectionsResult, RequestError, RouteEnricher,
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use crate::cache::RouteCache;
use crate::directions::{DirectionsProvider, ProviderError};

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Error)]
pub enum RouteError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    #[error("No route found matching criteria.")]
    NoRouteFound,
    #[error("Routing service request timed out")]
    UpstreamTimeout,
    #[error("Could not connect to routing service: {0}")]
    UpstreamUnavailable(String),
    #[error("Failed to calculate route. Provider status: {status}")]
    UpstreamError { status: String, detail: String },
    #[error("Server configuration error: directions provider is not configured")]
    ProviderNotConfigured,
}

impl From<ProviderError> for RouteError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout => RouteError::UpstreamTimeout,
            ProviderError::Unavailable(detail) => RouteError::UpstreamUnavailable(detail),
            ProviderError::InvalidPayload(detail) => RouteError::UpstreamError {
                status: "INVALID_RESPONSE".to_string(),
                detail,
            },
        }
    }
}

/// Computes enriched directions and owns the route cache.
pub struct RouteService {
    provider: Option<Arc<dyn DirectionsProvider>>,
    enricher: RouteEnricher,
    cache: RouteCache,
    /// One gate per key currently being fetched, so concurrent misses for the
    /// same request share a single upstream call.
    inflight: DashMap<CacheKey, Arc<Mutex<()>>>,
    upstream_timeout: Duration,
}

impl RouteService {
    pub fn new(
        provider: Option<Arc<dyn DirectionsProvider>>,
        enricher: RouteEnricher,
        cache_capacity: usize,
    ) -> Self {
        Self {
            provider,
            enricher,
            cache: RouteCache::new(cache_capacity),
            inflight: DashMap::new(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Directions for `request`, served from cache when an identical request
    /// was computed before.
    ///
    /// Hazards are captured when the entry is written; cache hits return the
    /// stored warnings even if accessibility points changed since.
    pub async fn compute_route(
        &self,
        request: DirectionsRequest,
    ) -> Result<Arc<DirectionsResponse>, RouteError> {
        request.validate()?;
        let Some(provider) = self.provider.as_ref() else {
            return Err(RouteError::ProviderNotConfigured);
        };

        let key = CacheKey::for_request(&request);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Route cache hit");
            return Ok(hit);
        }

        let gate = InflightGate::join(&self.inflight, key.clone());
        let _lock = gate.lock().await;

        match self.cache.get(&key) {
            Some(hit) => {
                tracing::debug!(key = %key, "Route cache filled while waiting");
                Ok(hit)
            }
            None => self.fetch_and_store(provider.as_ref(), &request, &key).await,
        }
    }

    async fn fetch_and_store(
        &self,
        provider: &dyn DirectionsProvider,
        request: &DirectionsRequest,
        key: &CacheKey,
    ) -> Result<Arc<DirectionsResponse>, RouteError> {
        let params = DirectionsParams::from_request(request);
        let result =
            match tokio::time::timeout(self.upstream_timeout, provider.fetch_directions(&params))
                .await
            {
                Ok(Ok(result)) => result,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "Directions provider call failed");
                    return Err(err.into());
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_s = self.upstream_timeout.as_secs(),
                        "Directions provider call timed out"
                    );
                    return Err(RouteError::UpstreamTimeout);
                }
            };

        check_status(&result)?;

        let warnings = match result.overview_polyline() {
            None => Vec::new(),
            Some(encoded) => match polyline::decode(encoded) {
                Ok(path) => self.enricher.enrich(&path).await,
                Err(err) => {
                    tracing::warn!(error = %err, "Could not decode overview polyline");
                    Vec::new()
                }
            },
        };

        let response = Arc::new(DirectionsResponse {
            result,
            custom_accessibility_warnings: warnings,
        });
        let evicted = self.cache.put(key.clone(), response.clone());
        tracing::info!(
            warnings = response.custom_accessibility_warnings.len(),
            cache_size = self.cache.len(),
            evicted,
            "Calculated and cached route"
        );
        Ok(response)
    }
}

/// A waiter's share of the per-key gate. Dropping it, on completion or when
/// the request future is cancelled, removes the map entry once no other
/// waiter holds the gate.
struct InflightGate<'a> {
    inflight: &'a DashMap<CacheKey, Arc<Mutex<()>>>,
    key: CacheKey,
    gate: Arc<Mutex<()>>,
}

impl<'a> InflightGate<'a> {
    fn join(inflight: &'a DashMap<CacheKey, Arc<Mutex<()>>>, key: CacheKey) -> Self {
        let gate = inflight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self { inflight, key, gate }
    }

    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}

impl Drop for InflightGate<'_> {
    fn drop(&mut self) {
        // The map and this waiter are the last two holders.
        self.inflight
            .remove_if(&self.key, |_, gate| {
                Arc::ptr_eq(gate, &self.gate) && Arc::strong_count(gate) == 2
            });
    }
}

fn check_status(result: &DirectionsResult) -> Result<(), RouteError> {
    match result.status.as_str() {
        STATUS_OK => Ok(()),
        STATUS_ZERO_RESULTS => Err(RouteError::NoRouteFound),
        other => {
            let detail = result
                .error_message
                .clone()
                .unwrap_or_else(|| "Unknown directions provider error".to_string());
            tracing::warn!(status = other, detail = %detail, "Directions provider rejected request");
            Err(RouteError::UpstreamError {
                status: other.to_string(),
                detail,
            })
        }
    }
}
