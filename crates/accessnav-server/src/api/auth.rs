//! Caller identity extraction and per-IP rate limiting.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::api::error::ApiError;
use crate::state::AppState;

/// The user a request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = state.identity().current_user_id(&parts.headers)?;
        Ok(AuthUser(user_id))
    }
}

/// Sliding one-second window per client IP.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<String, Vec<Instant>>>,
    last_cleanup: Arc<Mutex<Instant>>,
    cleanup_interval: Duration,
    max_rps: u32,
    max_tracked_ips: usize,
    enabled: bool,
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(max_rps: u32, enabled: bool, trust_proxy: bool, max_tracked_ips: usize) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
            cleanup_interval: Duration::from_secs(60),
            max_rps: max_rps.max(1),
            max_tracked_ips: max_tracked_ips.max(1),
            enabled,
            trust_proxy,
        }
    }

    /// Returns true if the request is allowed.
    pub fn check(&self, ip: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let window = Duration::from_secs(1);
        let do_cleanup = {
            let mut last_cleanup = self
                .last_cleanup
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if now.duration_since(*last_cleanup) >= self.cleanup_interval
                || self.requests.len() >= self.max_tracked_ips
            {
                *last_cleanup = now;
                true
            } else {
                false
            }
        };
        if do_cleanup {
            self.purge_stale_entries(now, window);
        }

        let mut entry = self.requests.entry(ip.to_string()).or_default();
        let timestamps = entry.value_mut();
        timestamps.retain(|t| now.duration_since(*t) < window);

        if timestamps.len() < self.max_rps as usize {
            timestamps.push(now);
            true
        } else {
            false
        }
    }

    pub fn tracked_ips(&self) -> usize {
        self.requests.len()
    }

    fn purge_stale_entries(&self, now: Instant, window: Duration) {
        self.requests
            .retain(|_, stamps| stamps.iter().any(|t| now.duration_since(*t) < window));
    }

    fn client_ip(&self, request: &Request) -> String {
        let forwarded = if self.trust_proxy {
            request
                .headers()
                .get("X-Forwarded-For")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        } else {
            None
        };

        forwarded
            .or_else(|| {
                request
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = limiter.client_ip(&request);

    if limiter.check(&ip) {
        next.run(request).await
    } else {
        tracing::debug!(ip = %ip, "Rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "Rate limit exceeded",
                "retry_after": "1 second"
            })),
        )
            .into_response()
    }
}
