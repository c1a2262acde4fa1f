use crate::app_config::{AppConfig, Environment};
use crate::sync_config::ReconcileMode;
use crate::ConfigError;

const DEFAULT_API_BASE_URL: &str = "https://int.lightspeeddataservices.com/lsapi/unit/76214633";

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
/// Parsing and validation live here, decoupled from the process environment,
/// so tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

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

    let parse_flag = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_bool(&or_default(var, default))
            .ok_or_else(|| invalid(var, "expected one of true/false/1/0/yes/no/on/off".into()))
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("UNITSYNC_ENV", "development"))?;
    let bind_addr = parse_addr("UNITSYNC_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("UNITSYNC_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("UNITSYNC_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("UNITSYNC_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("UNITSYNC_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "UNITSYNC_DB_MIN_CONNECTIONS",
            format!("must not exceed UNITSYNC_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    let api_base_url = or_default("UNITSYNC_API_BASE_URL", DEFAULT_API_BASE_URL);
    let api_username = or_default("UNITSYNC_API_USERNAME", "");
    let api_password = or_default("UNITSYNC_API_PASSWORD", "");

    let fetch_interval_hours = parse_u64("UNITSYNC_FETCH_INTERVAL_HOURS", "1")?;
    if fetch_interval_hours == 0 {
        return Err(invalid(
            "UNITSYNC_FETCH_INTERVAL_HOURS",
            "must be at least 1".into(),
        ));
    }

    let enable_debug = parse_flag("UNITSYNC_ENABLE_DEBUG", "false")?;
    let request_timeout_secs = parse_u64("UNITSYNC_REQUEST_TIMEOUT_SECS", "45")?;
    let accept_invalid_certs = parse_flag("UNITSYNC_ACCEPT_INVALID_CERTS", "true")?;
    let user_agent = or_default("UNITSYNC_USER_AGENT", "unitsync/0.1 (inventory-sync)");

    let reconcile_mode = or_default("UNITSYNC_RECONCILE_MODE", "upsert")
        .parse::<ReconcileMode>()
        .map_err(|reason| invalid("UNITSYNC_RECONCILE_MODE", reason))?;

    let debug_log_capacity = parse_usize("UNITSYNC_DEBUG_LOG_CAPACITY", "500")?;
    if debug_log_capacity == 0 {
        return Err(invalid(
            "UNITSYNC_DEBUG_LOG_CAPACITY",
            "must be at least 1".into(),
        ));
    }

    let api_keys = split_api_keys(&or_default("UNITSYNC_API_KEYS", ""));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        api_base_url,
        api_username,
        api_password,
        fetch_interval_hours,
        enable_debug,
        request_timeout_secs,
        accept_invalid_certs,
        user_agent,
        reconcile_mode,
        debug_log_capacity,
        api_keys,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "UNITSYNC_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn split_api_keys(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
