//! # Cache Module
//!
//! Cache store abstraction, its Redis and in-memory backends, and the
//! connection entry point used at process start.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_client;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use casino_domain::{CacheKey, CasinoId, DEFAULT_KEY_PREFIX};

use crate::error::{CacheError, Result};

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_client::CacheClient;
pub use store::{CacheStore, CacheStoreExt, SharedCacheStore};

/// URL scheme selecting the in-process backend
pub const MEMORY_URL: &str = "memory://";

/// Default entry lifetime (one hour)
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// `redis://host:port[/db]` or `memory://`
    pub url: String,
    /// Lifetime of entries written after an upstream fetch
    pub ttl: Duration,
    /// Namespace for casino keys
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            ttl: DEFAULT_TTL,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    /// Cache key for a casino document
    pub fn key_for(&self, id: &CasinoId) -> CacheKey {
        CacheKey::for_casino(&self.key_prefix, id)
    }
}

/// Open the configured cache backend
///
/// # Errors
///
/// Returns an error if the URL names an unsupported backend or the initial
/// Redis connection fails.
pub async fn connect(config: &CacheConfig) -> Result<SharedCacheStore> {
    if config.url.starts_with(MEMORY_URL) {
        return Ok(Arc::new(MemoryStore::new()));
    }

    #[cfg(feature = "redis")]
    if config.url.starts_with("redis://") || config.url.starts_with("rediss://") {
        return Ok(Arc::new(CacheClient::new(config).await?));
    }

    Err(CacheError::InvalidUrl(config.url.clone()))
}
