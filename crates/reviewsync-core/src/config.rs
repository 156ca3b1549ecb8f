use crate::app_config::{AppConfig, DEFAULT_SOURCE_URL, DEFAULT_TABLE_NAME};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Nothing is required: store credentials are optional (their absence turns
/// sync into a no-op) and every tuning knob has a default.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_flag(&raw).ok_or_else(|| invalid(var, format!("expected a boolean, got \"{raw}\"")))
    };

    let airtable_api_key = optional("AIRTABLE_API_KEY");
    let airtable_base_id = optional("AIRTABLE_BASE_ID");
    let airtable_table_name = or_default("AIRTABLE_TABLE_NAME", DEFAULT_TABLE_NAME);
    let store_timeout_secs = parse_u64("REVIEWSYNC_STORE_TIMEOUT_SECS", "30")?;

    let bind_addr = parse_addr("REVIEWSYNC_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("REVIEWSYNC_LOG_LEVEL", "info");
    let source_url = or_default("REVIEWSYNC_SOURCE_URL", DEFAULT_SOURCE_URL);

    let headless = parse_bool("REVIEWSYNC_HEADLESS", "true")?;
    let chrome_path = optional("REVIEWSYNC_CHROME_PATH").map(PathBuf::from);
    let settle_ms = parse_u64("REVIEWSYNC_SETTLE_MS", "1200")?;
    let page_load_wait_ms = parse_u64("REVIEWSYNC_PAGE_LOAD_WAIT_MS", "2500")?;

    Ok(AppConfig {
        airtable_api_key,
        airtable_base_id,
        airtable_table_name,
        store_timeout_secs,
        bind_addr,
        log_level,
        source_url,
        headless,
        chrome_path,
        settle_ms,
        page_load_wait_ms,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
