use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("CHARGEMAP_ENV", "development"))?;

    let bind_addr = parse_addr("CHARGEMAP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CHARGEMAP_LOG_LEVEL", "info");

    let feed_path = PathBuf::from(or_default(
        "CHARGEMAP_FEED_PATH",
        "./data/charging-stations.json",
    ));
    let feed_request_timeout_secs = parse_u64("CHARGEMAP_FEED_REQUEST_TIMEOUT_SECS", "30")?;

    let ingest_batch_size = parse_usize("CHARGEMAP_INGEST_BATCH_SIZE", "50")?;
    if ingest_batch_size == 0 {
        return Err(invalid(
            "CHARGEMAP_INGEST_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }
    let ingest_max_stations = match lookup("CHARGEMAP_INGEST_MAX_STATIONS") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<usize>()
                .map_err(|e| invalid("CHARGEMAP_INGEST_MAX_STATIONS", e.to_string()))?,
        ),
        _ => None,
    };

    let db_max_connections = parse_u32("CHARGEMAP_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("CHARGEMAP_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "CHARGEMAP_DB_MIN_CONNECTIONS",
            format!("{db_min_connections} exceeds CHARGEMAP_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("CHARGEMAP_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let query_max_page_size = parse_u32("CHARGEMAP_QUERY_MAX_PAGE_SIZE", "100")?;
    if query_max_page_size == 0 {
        return Err(invalid(
            "CHARGEMAP_QUERY_MAX_PAGE_SIZE",
            "must be at least 1".to_string(),
        ));
    }
    let query_default_page_size = parse_u32("CHARGEMAP_QUERY_DEFAULT_PAGE_SIZE", "10")?;
    if query_default_page_size == 0 || query_default_page_size > query_max_page_size {
        return Err(invalid(
            "CHARGEMAP_QUERY_DEFAULT_PAGE_SIZE",
            format!("must be between 1 and {query_max_page_size}"),
        ));
    }

    let rate_limit_max_requests = parse_usize("CHARGEMAP_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("CHARGEMAP_RATE_LIMIT_WINDOW_SECS", "60")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        feed_path,
        feed_request_timeout_secs,
        ingest_batch_size,
        ingest_max_stations,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        query_default_page_size,
        query_max_page_size,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CHARGEMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
