use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

const DEFAULT_REFERENCE_LAT: &str = "37.5617864";
const DEFAULT_REFERENCE_LON: &str = "126.9910438";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses and validates configuration through `lookup`, so tests can feed a
/// plain map instead of touching the process environment.
///
/// Credentials are all optional: a missing database URL or search key
/// disables that feature alone.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let database_url = optional("DATABASE_URL");
    let kakao_rest_api_key = optional("KAKAO_REST_API_KEY");
    let kakao_js_api_key = optional("KAKAO_JS_API_KEY");

    let env = parse_environment(&or_default("LUNCHMAP_ENV", "development"));
    let bind_addr: SocketAddr = parse_as(
        "LUNCHMAP_BIND_ADDR",
        &or_default("LUNCHMAP_BIND_ADDR", "0.0.0.0:3000"),
    )?;
    let log_level = or_default("LUNCHMAP_LOG_LEVEL", "info");

    let lat: f64 = parse_as(
        "LUNCHMAP_REFERENCE_LAT",
        &or_default("LUNCHMAP_REFERENCE_LAT", DEFAULT_REFERENCE_LAT),
    )?;
    let lon: f64 = parse_as(
        "LUNCHMAP_REFERENCE_LON",
        &or_default("LUNCHMAP_REFERENCE_LON", DEFAULT_REFERENCE_LON),
    )?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ConfigError::InvalidEnvVar {
            var: "LUNCHMAP_REFERENCE_LAT".to_string(),
            reason: format!("latitude {lat} is outside [-90, 90]"),
        });
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ConfigError::InvalidEnvVar {
            var: "LUNCHMAP_REFERENCE_LON".to_string(),
            reason: format!("longitude {lon} is outside [-180, 180]"),
        });
    }
    let reference_name = or_default("LUNCHMAP_REFERENCE_NAME", "Office");

    let search_radius_m: u32 = parse_as(
        "LUNCHMAP_SEARCH_RADIUS_M",
        &or_default("LUNCHMAP_SEARCH_RADIUS_M", "1000"),
    )?;
    let table_cache_ttl_secs: u64 = parse_as(
        "LUNCHMAP_TABLE_CACHE_TTL_SECS",
        &or_default("LUNCHMAP_TABLE_CACHE_TTL_SECS", "60"),
    )?;
    let session_idle_secs: u64 = parse_as(
        "LUNCHMAP_SESSION_IDLE_SECS",
        &or_default("LUNCHMAP_SESSION_IDLE_SECS", "3600"),
    )?;
    if session_idle_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LUNCHMAP_SESSION_IDLE_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let seed_path = optional("LUNCHMAP_SEED_PATH").map(PathBuf::from);

    let db_max_connections: u32 = parse_as(
        "LUNCHMAP_DB_MAX_CONNECTIONS",
        &or_default("LUNCHMAP_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections: u32 = parse_as(
        "LUNCHMAP_DB_MIN_CONNECTIONS",
        &or_default("LUNCHMAP_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_as(
        "LUNCHMAP_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("LUNCHMAP_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        kakao_rest_api_key,
        kakao_js_api_key,
        reference: Coordinate::new(lat, lon),
        reference_name,
        search_radius_m,
        table_cache_ttl_secs,
        session_idle_secs,
        seed_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
