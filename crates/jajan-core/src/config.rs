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
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    }

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let positive = |var: &str, ok: bool| -> Result<(), ConfigError> {
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            })
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("JAJAN_ENV", "development"))?;

    let bind_addr: SocketAddr =
        parse_as("JAJAN_BIND_ADDR", &or_default("JAJAN_BIND_ADDR", "0.0.0.0:3000"))?;
    let log_level = or_default("JAJAN_LOG_LEVEL", "info");

    let db_max_connections: u32 = parse_as(
        "JAJAN_DB_MAX_CONNECTIONS",
        &or_default("JAJAN_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections: u32 = parse_as(
        "JAJAN_DB_MIN_CONNECTIONS",
        &or_default("JAJAN_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_as(
        "JAJAN_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("JAJAN_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let search_timeout_secs: u64 = parse_as(
        "JAJAN_SEARCH_TIMEOUT_SECS",
        &or_default("JAJAN_SEARCH_TIMEOUT_SECS", "10"),
    )?;
    positive("JAJAN_SEARCH_TIMEOUT_SECS", search_timeout_secs > 0)?;

    let default_radius_meters: f64 = parse_as(
        "JAJAN_DEFAULT_RADIUS_METERS",
        &or_default("JAJAN_DEFAULT_RADIUS_METERS", "5000"),
    )?;
    positive(
        "JAJAN_DEFAULT_RADIUS_METERS",
        default_radius_meters.is_finite() && default_radius_meters > 0.0,
    )?;

    let over_fetch_factor: usize = parse_as(
        "JAJAN_OVER_FETCH_FACTOR",
        &or_default("JAJAN_OVER_FETCH_FACTOR", "3"),
    )?;
    positive("JAJAN_OVER_FETCH_FACTOR", over_fetch_factor > 0)?;

    let max_page_size: usize = parse_as(
        "JAJAN_MAX_PAGE_SIZE",
        &or_default("JAJAN_MAX_PAGE_SIZE", "50"),
    )?;
    positive("JAJAN_MAX_PAGE_SIZE", max_page_size > 0)?;

    let seed_path = lookup("JAJAN_SEED_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        search_timeout_secs,
        default_radius_meters,
        over_fetch_factor,
        max_page_size,
        seed_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "JAJAN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
