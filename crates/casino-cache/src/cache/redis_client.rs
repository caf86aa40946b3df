//! # Redis Cache Layer
//!
//! Redis client wrapper backing the casino document cache.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::store::{ttl_secs, CacheStore};
use super::CacheConfig;
use crate::error::Result;

/// Redis cache client over a single multiplexed connection
#[derive(Clone)]
pub struct CacheClient {
    conn: ConnectionManager,
}

impl CacheClient {
    /// Create a new cache client
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the initial connection fails.
    pub async fn new(config: &CacheConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }

    #[cfg(test)]
    fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl CacheStore for CacheClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl_secs(ttl)).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::CacheStoreExt;
    use serde_json::json;

    fn redis_url() -> String {
        std::env::var("TEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_redis_roundtrip_with_expiry() {
        let config = CacheConfig {
            url: redis_url(),
            ..Default::default()
        };
        let client = CacheClient::new(&config).await.unwrap();
        client.ping().await.unwrap();

        let key = "casino:test-redis-roundtrip";
        client
            .set_json(key, &json!({"bonus": 100}), Duration::from_secs(60))
            .await
            .unwrap();

        let stored: Option<serde_json::Value> = client.get_json(key).await.unwrap();
        assert_eq!(stored, Some(json!({"bonus": 100})));

        let ttl: i64 = client.connection().ttl(key).await.unwrap();
        assert!(ttl > 0 && ttl <= 60);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_redis_missing_key_is_none() {
        let config = CacheConfig {
            url: redis_url(),
            ..Default::default()
        };
        let client = CacheClient::new(&config).await.unwrap();

        let value = client.get("casino:definitely-not-present").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let config = CacheConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(CacheClient::new(&config).await.is_err());
    }
}
