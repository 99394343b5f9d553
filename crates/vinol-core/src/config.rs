use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_RETAILER_BASE_URL: &str = "https://www.systembolaget.se";
pub const DEFAULT_UNTAPPD_BASE_URL: &str = "https://untappd.com";
pub const DEFAULT_HACHETTE_BASE_URL: &str = "https://www.hachette-vins.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so it can be tested with a plain `HashMap` instead of the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, raw: &str| -> Result<u64, ConfigError> {
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim_end_matches('/').to_string();
        reqwest::Url::parse(&trimmed).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        Ok(trimmed)
    };

    let log_level = or_default("VINOL_LOG_LEVEL", "info");
    let user_agent = or_default("VINOL_USER_AGENT", "vinol/0.1 (rating-lookup)");

    let request_timeout_secs = match lookup("VINOL_REQUEST_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => {
            Some(parse_u64("VINOL_REQUEST_TIMEOUT_SECS", raw.trim())?)
        }
        _ => None,
    };

    let cache_ttl_hours = parse_u64(
        "VINOL_CACHE_TTL_HOURS",
        &or_default("VINOL_CACHE_TTL_HOURS", "24"),
    )?;
    let cache_dir = lookup("VINOL_CACHE_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from);

    let retailer_base_url = base_url("VINOL_RETAILER_BASE_URL", DEFAULT_RETAILER_BASE_URL)?;
    let untappd_base_url = base_url("VINOL_UNTAPPD_BASE_URL", DEFAULT_UNTAPPD_BASE_URL)?;
    let hachette_base_url = base_url("VINOL_HACHETTE_BASE_URL", DEFAULT_HACHETTE_BASE_URL)?;

    Ok(AppConfig {
        log_level,
        user_agent,
        request_timeout_secs,
        cache_ttl_hours,
        cache_dir,
        retailer_base_url,
        untappd_base_url,
        hachette_base_url,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
