//! Route enrichment: hazard lookup along a decoded route path.

use crate::models::{Coordinate, HazardPoint};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Search radius around each sampled vertex.
pub const DEFAULT_SAMPLE_RADIUS_M: f64 = 25.0;
/// Target number of store queries per route.
pub const TARGET_SAMPLES: usize = 100;
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("point store unavailable: {0}")]
    Unavailable(String),
}

/// Proximity lookup over stored accessibility points.
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Points within `radius_m` meters (great-circle) of `point`.
    async fn find_near(
        &self,
        point: Coordinate,
        radius_m: f64,
    ) -> Result<Vec<HazardPoint>, StoreError>;
}

/// Stride used to keep roughly [`TARGET_SAMPLES`] vertices of a path.
pub fn sample_step(len: usize) -> usize {
    (len / TARGET_SAMPLES).max(1)
}

/// Every `sample_step(len)`-th vertex, starting at index 0.
pub fn downsample(path: &[Coordinate]) -> Vec<Coordinate> {
    path.iter().step_by(sample_step(path.len())).copied().collect()
}

#[derive(Debug, Clone, Copy)]
pub struct EnrichmentConfig {
    pub radius_m: f64,
    pub query_timeout: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_SAMPLE_RADIUS_M,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// Collects hazards near a route from an optional point store.
#[derive(Clone)]
pub struct RouteEnricher {
    store: Option<Arc<dyn PointStore>>,
    config: EnrichmentConfig,
}

impl RouteEnricher {
    pub fn new(store: Arc<dyn PointStore>, config: EnrichmentConfig) -> Self {
        Self {
            store: Some(store),
            config,
        }
    }

    /// Enricher with no backing store; always yields no hazards.
    pub fn disabled() -> Self {
        Self {
            store: None,
            config: EnrichmentConfig::default(),
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Hazards near the downsampled path, deduplicated by id in
    /// first-discovery order.
    ///
    /// Samples are queried one at a time. A failed or timed-out sample
    /// contributes nothing and the remaining samples are still queried.
    pub async fn enrich(&self, path: &[Coordinate]) -> Vec<HazardPoint> {
        let Some(store) = self.store.as_ref() else {
            return Vec::new();
        };
        if path.is_empty() {
            return Vec::new();
        }

        let samples = downsample(path);
        let mut seen: HashSet<String> = HashSet::new();
        let mut hazards = Vec::new();
        let mut failed_samples = 0usize;

        for (index, sample) in samples.iter().enumerate() {
            let lookup = store.find_near(*sample, self.config.radius_m);
            let found = match tokio::time::timeout(self.config.query_timeout, lookup).await {
                Ok(Ok(found)) => found,
                Ok(Err(err)) => {
                    failed_samples += 1;
                    tracing::warn!(sample = index, error = %err, "Hazard lookup failed");
                    continue;
                }
                Err(_) => {
                    failed_samples += 1;
                    tracing::warn!(
                        sample = index,
                        timeout_ms = self.config.query_timeout.as_millis() as u64,
                        "Hazard lookup timed out"
                    );
                    continue;
                }
            };

            for hazard in found {
                if seen.insert(hazard.id.clone()) {
                    hazards.push(hazard);
                }
            }
        }

        tracing::debug!(
            path_points = path.len(),
            samples = samples.len(),
            failed_samples,
            hazards = hazards.len(),
            "Route enrichment complete"
        );
        hazards
    }
}
