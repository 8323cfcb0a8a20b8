//! Server configuration from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
pub const DEFAULT_DEV_USER_ID: &str = "temp_user_id_for_testing";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    pub google_maps_api_key: Option<String>,
    pub directions_url: String,
    pub directions_timeout_s: u64,
    pub route_cache_capacity: usize,
    pub hazard_search_radius_m: f64,
    pub point_query_timeout_ms: u64,
    pub frontend_url: String,
    pub jwt_secret: Option<String>,
    pub dev_user_id: String,
    pub rate_limit_enabled: bool,
    pub route_rate_limit_rps: u32,
    pub rate_limit_max_tracked_ips: usize,
    pub trust_proxy: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: parse_env("ACCESSNAV_PORT", 5001),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/accessnav.db".to_string()),
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5),
            google_maps_api_key: non_empty_env("GOOGLE_MAPS_API_KEY"),
            directions_url: env::var("DIRECTIONS_API_URL")
                .unwrap_or_else(|_| DEFAULT_DIRECTIONS_URL.to_string()),
            directions_timeout_s: parse_env("DIRECTIONS_TIMEOUT_S", 10),
            route_cache_capacity: parse_env("ROUTE_CACHE_CAPACITY", 100),
            hazard_search_radius_m: parse_env("HAZARD_SEARCH_RADIUS_M", 25.0),
            point_query_timeout_ms: parse_env("POINT_QUERY_TIMEOUT_MS", 2_000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_secret: non_empty_env("JWT_SECRET"),
            dev_user_id: env::var("ACCESSNAV_DEV_USER_ID")
                .unwrap_or_else(|_| DEFAULT_DEV_USER_ID.to_string()),
            rate_limit_enabled: parse_env("RATE_LIMIT_ENABLED", true),
            route_rate_limit_rps: parse_env("ROUTE_RATE_LIMIT_RPS", 10),
            rate_limit_max_tracked_ips: parse_env("RATE_LIMIT_MAX_TRACKED_IPS", 10_000),
            trust_proxy: parse_env("TRUST_PROXY", false),
        }
    }

    pub fn directions_timeout(&self) -> Duration {
        Duration::from_secs(self.directions_timeout_s.max(1))
    }

    pub fn point_query_timeout(&self) -> Duration {
        Duration::from_millis(self.point_query_timeout_ms.max(1))
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
