//! Application state shared by every request handler.

use accessnav_core::{EnrichmentConfig, RouteEnricher};
use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::directions::{DirectionsProvider, GoogleDirectionsClient};
use crate::identity::{IdentityProvider, JwtIdentity, StaticIdentity};
use crate::persistence::{Database, SqlitePointStore};
use crate::route_service::RouteService;

pub struct AppState {
    db: Database,
    routes: RouteService,
    identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(db: Database, routes: RouteService, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            db,
            routes,
            identity,
        }
    }

    /// Wire the production collaborators from configuration.
    ///
    /// The directions client is only built when an API key is present;
    /// without one, route requests fail with a configuration error.
    pub fn from_config(db: Database, config: &Config) -> Result<Self> {
        let provider: Option<Arc<dyn DirectionsProvider>> = match &config.google_maps_api_key {
            Some(key) => Some(Arc::new(GoogleDirectionsClient::new(
                config.directions_url.clone(),
                key.clone(),
                config.directions_timeout(),
            )?)),
            None => {
                tracing::warn!("GOOGLE_MAPS_API_KEY not set; route requests will be rejected");
                None
            }
        };

        let enricher = RouteEnricher::new(
            Arc::new(SqlitePointStore::new(db.pool().clone())),
            EnrichmentConfig {
                radius_m: config.hazard_search_radius_m,
                query_timeout: config.point_query_timeout(),
            },
        );
        let routes = RouteService::new(provider, enricher, config.route_cache_capacity)
            .with_upstream_timeout(config.directions_timeout());

        let identity: Arc<dyn IdentityProvider> = match &config.jwt_secret {
            Some(secret) => Arc::new(JwtIdentity::new(secret)),
            None => {
                tracing::warn!(
                    user_id = %config.dev_user_id,
                    "JWT_SECRET not set; all requests use the development identity"
                );
                Arc::new(StaticIdentity::new(config.dev_user_id.clone()))
            }
        };

        Ok(Self::new(db, routes, identity))
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn routes(&self) -> &RouteService {
        &self.routes
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }
}
