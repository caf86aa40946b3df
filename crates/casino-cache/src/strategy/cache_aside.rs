//! Cache-aside read: look up, on miss fetch from the source and populate.

use std::future::Future;
use std::time::Duration;

use casino_domain::CacheKey;
use serde::{de::DeserializeOwned, Serialize};

use crate::cache::{CacheStore, CacheStoreExt};
use crate::error::CacheError;

/// Where a value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Served from the cache, the source was not contacted
    Hit(T),
    /// Fetched from the source and written to the cache
    Miss(T),
}

impl<T> Lookup<T> {
    /// `HIT` or `MISS`, as reported in the `x-cache` response header
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit(_) => "HIT",
            Self::Miss(_) => "MISS",
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Hit(value) | Self::Miss(value) => value,
        }
    }
}

/// Cache-aside read failure.
///
/// Cache failures are not swallowed: without a working cache the lookup
/// and the populate step both fail the read.
#[derive(Debug, thiserror::Error)]
pub enum ReadError<E> {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Source error: {0}")]
    Source(E),
}

/// Cache-aside reader bound to a store and an entry lifetime
#[derive(Clone, Copy)]
pub struct CacheAside<'a> {
    store: &'a dyn CacheStore,
    ttl: Duration,
}

impl<'a> CacheAside<'a> {
    pub fn new(store: &'a dyn CacheStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Read `key`, calling `fetch` only on a miss.
    ///
    /// A fetched value is written back with the configured TTL before it is
    /// returned. Concurrent misses on the same key each call `fetch` and
    /// each write; the last write wins.
    pub async fn read<T, E, Fut>(
        &self,
        key: &CacheKey,
        fetch: impl FnOnce() -> Fut,
    ) -> Result<Lookup<T>, ReadError<E>>
    where
        T: Serialize + DeserializeOwned + Sync,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.store.get_json(key.as_str()).await? {
            tracing::debug!(%key, "Cache hit");
            return Ok(Lookup::Hit(value));
        }

        tracing::debug!(%key, "Cache miss, fetching from source");
        let value = fetch().await.map_err(ReadError::Source)?;

        self.store.set_json(key.as_str(), &value, self.ttl).await?;
        tracing::debug!(%key, ttl_secs = self.ttl.as_secs(), "Cache populated");

        Ok(Lookup::Miss(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use async_trait::async_trait;
    use casino_domain::CasinoId;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(3600);

    fn key(id: &str) -> CacheKey {
        CacheKey::for_casino("casino", &CasinoId::parse(id).unwrap())
    }

    /// Store whose every operation fails, as when Redis is down
    struct UnavailableStore;

    #[async_trait]
    impl CacheStore for UnavailableStore {
        async fn get(&self, _key: &str) -> crate::Result<Option<String>> {
            Err(CacheError::Redis("connection refused".to_string()))
        }

        async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> crate::Result<()> {
            Err(CacheError::Redis("connection refused".to_string()))
        }

        async fn ping(&self) -> crate::Result<()> {
            Err(CacheError::Redis("connection refused".to_string()))
        }

        fn backend(&self) -> &'static str {
            "unavailable"
        }
    }

    #[tokio::test]
    async fn test_miss_fetches_and_populates() {
        let store = MemoryStore::new();
        let reader = CacheAside::new(&store, TTL);

        let result = reader
            .read(&key("42"), || async { Ok::<_, String>(json!({"bonus": 100})) })
            .await
            .unwrap();

        assert_eq!(result, Lookup::Miss(json!({"bonus": 100})));
        assert_eq!(
            store.get("casino:42").await.unwrap().as_deref(),
            Some(r#"{"bonus":100}"#)
        );
        assert!(store.ttl("casino:42").await.unwrap() > Duration::from_secs(3590));
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let store = MemoryStore::new();
        store.set_ex("casino:42", r#"{"bonus":100}"#, TTL).await.unwrap();
        let reader = CacheAside::new(&store, TTL);

        let fetches = AtomicUsize::new(0);

        let result = reader
            .read::<Value, String, _>(&key("42"), || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            })
            .await
            .unwrap();

        assert!(matches!(result, Lookup::Hit(_)));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(result.into_inner(), json!({"bonus": 100}));
    }

    #[tokio::test]
    async fn test_source_error_is_not_cached() {
        let store = MemoryStore::new();
        let reader = CacheAside::new(&store, TTL);

        let err = reader
            .read::<Value, _, _>(&key("404"), || async { Err("not found".to_string()) })
            .await
            .unwrap_err();

        assert!(matches!(err, ReadError::Source(ref s) if s == "not found"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_failure_propagates_without_fetch() {
        let fetches = AtomicUsize::new(0);
        let reader = CacheAside::new(&UnavailableStore, TTL);

        let err = reader
            .read::<Value, String, _>(&key("42"), || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(json!({}))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ReadError::Cache(CacheError::Redis(_))));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_cache_error() {
        let store = MemoryStore::new();
        store.set_ex("casino:42", "{not json", TTL).await.unwrap();
        let reader = CacheAside::new(&store, TTL);

        let err = reader
            .read::<Value, String, _>(&key("42"), || async { Ok(json!({})) })
            .await
            .unwrap_err();

        assert!(matches!(err, ReadError::Cache(CacheError::Serialization(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_expiry() {
        let store = MemoryStore::new();
        let reader = CacheAside::new(&store, TTL);
        let fetches = AtomicUsize::new(0);

        for _ in 0..3 {
            reader
                .read::<Value, String, _>(&key("7"), || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"bonus": 7}))
                })
                .await
                .unwrap();
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        tokio::time::advance(TTL).await;

        let again = reader
            .read::<Value, String, _>(&key("7"), || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"bonus": 7}))
            })
            .await
            .unwrap();
        assert!(matches!(again, Lookup::Miss(_)));
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }
}
