use crate::app_config::{AppConfig, Environment, StructuredScrapeConfig, VendorEndpoint};
use crate::retailer::Retailer;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Core parsing/validation logic, decoupled from the process environment so
/// tests can drive it from a `HashMap`.
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

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    // Both halves of an endpoint must be present; a lone URL or key is a
    // configuration mistake rather than "tier disabled".
    let endpoint = |url_var: &str, key_var: &str| -> Result<Option<VendorEndpoint>, ConfigError> {
        match (optional(url_var), optional(key_var)) {
            (Some(base_url), Some(api_key)) => Ok(Some(VendorEndpoint {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(key_var.to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(url_var.to_string())),
        }
    };

    let env = parse_environment(&or_default("PASSPORT_ENV", "development"));
    let bind_addr = parse_addr("PASSPORT_BIND_ADDR", "0.0.0.0:3001")?;
    let log_level = or_default("PASSPORT_LOG_LEVEL", "info");
    let navigation_timeout_secs = parse_u64("PASSPORT_NAVIGATION_TIMEOUT_SECS", "30")?;
    let settle_delay_ms = parse_u64("PASSPORT_SETTLE_DELAY_MS", "1500")?;
    let user_agent = or_default("PASSPORT_USER_AGENT", DEFAULT_USER_AGENT);
    let snapshot_dir = optional("PASSPORT_SNAPSHOT_DIR").map(PathBuf::from);
    let rate_limit_per_minute = parse_usize("PASSPORT_RATE_LIMIT_PER_MINUTE", "60")?;

    let structured_scrape = match endpoint("SCRAPE_API_URL", "SCRAPE_API_KEY")? {
        Some(endpoint) => {
            let datasets = Retailer::ALL
                .into_iter()
                .filter_map(|retailer| {
                    let var = format!("SCRAPE_DATASET_{}", retailer.slug().to_ascii_uppercase());
                    optional(&var).map(|id| (retailer, id))
                })
                .collect();
            Some(StructuredScrapeConfig {
                endpoint,
                datasets,
                poll_attempts: parse_u32("SCRAPE_POLL_ATTEMPTS", "5")?,
                poll_interval_ms: parse_u64("SCRAPE_POLL_INTERVAL_MS", "2000")?,
            })
        }
        None => None,
    };

    let unlocker = endpoint("UNLOCKER_API_URL", "UNLOCKER_API_KEY")?;
    let web_search = endpoint("SEARCH_API_URL", "SEARCH_API_KEY")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        navigation_timeout_secs,
        settle_delay_ms,
        user_agent,
        snapshot_dir,
        rate_limit_per_minute,
        structured_scrape,
        unlocker,
        web_search,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
