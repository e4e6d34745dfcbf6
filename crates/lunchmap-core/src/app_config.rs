use std::net::SocketAddr;
use std::path::PathBuf;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// `None` leaves the store unconfigured; the table then reads as empty.
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// `None` disables place search; queries return no candidates.
    pub kakao_rest_api_key: Option<String>,
    /// Passed through to the map front-end.
    pub kakao_js_api_key: Option<String>,
    pub reference: Coordinate,
    pub reference_name: String,
    pub search_radius_m: u32,
    pub table_cache_ttl_secs: u64,
    /// Sessions untouched for this long are dropped.
    pub session_idle_secs: u64,
    pub seed_path: Option<PathBuf>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "kakao_rest_api_key",
                &self.kakao_rest_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "kakao_js_api_key",
                &self.kakao_js_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("reference", &self.reference)
            .field("reference_name", &self.reference_name)
            .field("search_radius_m", &self.search_radius_m)
            .field("table_cache_ttl_secs", &self.table_cache_ttl_secs)
            .field("session_idle_secs", &self.session_idle_secs)
            .field("seed_path", &self.seed_path)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
