//! Runtime configuration from environment variables

use crate::error::ConfigError;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the aggregator runtime
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,

    /// Capacity of every per-category number window
    pub window_size: usize,

    /// Lifetime of a cached ranking
    pub cache_ttl: Duration,

    /// Base address of the upstream data API
    pub api_base_url: String,

    /// Opaque bearer credential forwarded to the upstream API
    pub auth_token: Option<String>,

    /// Upper bound on a single upstream fetch
    pub fetch_timeout: Duration,
}

impl AggregatorConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `PORT` (default: 9876)
    /// - `BIND_ADDR` (default: 0.0.0.0)
    /// - `WINDOW_SIZE` (default: 10)
    /// - `CACHE_TTL` seconds (default: 300)
    /// - `API_BASE_URL`, falling back to `BASE_URL` (required)
    /// - `AUTH_TOKEN` (optional)
    /// - `FETCH_TIMEOUT_MS` (default: 500)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .or_else(|| lookup("BASE_URL"))
            .ok_or_else(|| ConfigError::MissingVariable("API_BASE_URL".to_string()))?;

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "API_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        let port: u16 = parse_or(&lookup, "PORT", 9876)?;
        let host = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());
        let bind_addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("BIND_ADDR '{}' is not an IP", host)))?;

        let window_size: usize = parse_or(&lookup, "WINDOW_SIZE", 10)?;
        if window_size == 0 {
            return Err(ConfigError::InvalidValue(
                "WINDOW_SIZE must be a positive integer".to_string(),
            ));
        }

        let cache_ttl_secs: u64 = parse_or(&lookup, "CACHE_TTL", 300)?;
        if cache_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "CACHE_TTL must be a positive number of seconds".to_string(),
            ));
        }

        let fetch_timeout_ms: u64 = parse_or(&lookup, "FETCH_TIMEOUT_MS", 500)?;
        if fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "FETCH_TIMEOUT_MS must be a positive number of milliseconds".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            window_size,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            api_base_url,
            auth_token: lookup("AUTH_TOKEN").filter(|t| !t.is_empty()),
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{}='{}' is not valid", key, raw))),
        None => Ok(default),
    }
}
