//! # Proxy Configuration
//!
//! Environment-based configuration for the casino data proxy.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use casino_cache::CacheConfig;
use casino_domain::{ResponseShape, DEFAULT_KEY_PREFIX};
use thiserror::Error;

/// Default upstream provider
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://adm.incasinowetrust.com";

/// Proxy server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// Cache backend, entry lifetime and key namespace
    pub cache: CacheConfig,

    /// Upstream provider configuration
    pub upstream: UpstreamConfig,

    /// Raw document or identifier envelope
    pub response_shape: ResponseShape,

    /// Logging level
    pub log_level: String,
}

/// Upstream provider configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Scheme and host (plus optional path prefix), no trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

/// Configuration errors reported at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparsable value.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_addr = parse_or(&get, "SERVER_ADDR", "0.0.0.0:8000".parse().ok())?;

        let cache = CacheConfig {
            url: get("CACHE_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            ttl: Duration::from_secs(positive_secs(&get, "CACHE_TTL_SECS", 3600)?),
            key_prefix: get("CACHE_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        };

        let base_url = get("UPSTREAM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());
        if let Err(e) = reqwest::Url::parse(&base_url) {
            return Err(ConfigError::Invalid {
                var: "UPSTREAM_BASE_URL",
                value: base_url,
                reason: e.to_string(),
            });
        }

        let upstream = UpstreamConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(positive_secs(&get, "UPSTREAM_TIMEOUT_SECS", 10)?),
        };

        let response_shape = parse_or(&get, "RESPONSE_SHAPE", Some(ResponseShape::Raw))?;

        Ok(Self {
            server_addr,
            cache,
            upstream,
            response_shape,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match (get(var), default) {
        (Some(value), _) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(ConfigError::Invalid {
            var,
            value: String::new(),
            reason: "no value and no default".to_string(),
        }),
    }
}

fn positive_secs(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    let secs: u64 = parse_or(get, var, Some(default))?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: secs.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(secs)
}
