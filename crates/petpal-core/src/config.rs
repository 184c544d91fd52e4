use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Origins of the mobile client during local development.
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8100,http://127.0.0.1:8100,http://localhost";

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
/// Parsing is decoupled from the real environment so it can be tested with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
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

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_positive_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let value = parse_positive_u64(var, default)?;
        u32::try_from(value).map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_positive_u64(var, default)?;
        usize::try_from(value).map_err(|e| invalid(var, e.to_string()))
    };

    let google_places_api_key = require("GOOGLE_PLACES_API_KEY")?;

    let env = parse_environment(&or_default("PETPAL_ENV", "development"));
    let bind_addr = parse_addr("PETPAL_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("PETPAL_LOG_LEVEL", "info");

    let places_base_url = or_default("PETPAL_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let places_timeout_secs = parse_positive_u64("PETPAL_PLACES_TIMEOUT_SECS", "10")?;

    let vet_search_radius_meters = parse_positive_u32("PETPAL_VET_SEARCH_RADIUS_METERS", "5000")?;
    let vet_search_keyword = or_default("PETPAL_VET_SEARCH_KEYWORD", "veterinarian");
    if vet_search_keyword.trim().is_empty() {
        return Err(invalid(
            "PETPAL_VET_SEARCH_KEYWORD",
            "must not be blank".to_string(),
        ));
    }

    let cors_origins = split_list(&or_default("PETPAL_CORS_ORIGINS", DEFAULT_CORS_ORIGINS));
    let api_tokens = split_list(&or_default("PETPAL_API_TOKENS", ""));
    let rate_limit_per_minute = parse_positive_usize("PETPAL_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        google_places_api_key,
        places_base_url,
        places_timeout_secs,
        vet_search_radius_meters,
        vet_search_keyword,
        cors_origins,
        api_tokens,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
