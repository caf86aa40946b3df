//! # Casino Cache Library
//!
//! Cache layer for the casino data proxy.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Request Handler                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CacheAside strategy                         │
//! │          (lookup, fetch on miss, populate with TTL)          │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │   CacheStore (Redis /   │   │      Upstream provider       │
//! │      in-memory)         │   │     (caller-supplied fetch)  │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - `redis`: Enable the Redis backend (default)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use casino_cache::{cache, CacheAside, CacheConfig};
//!
//! let config = CacheConfig::default();
//! let store = cache::connect(&config).await?;
//!
//! let key = config.key_for(&casino_id);
//! let lookup = CacheAside::new(store.as_ref(), config.ttl)
//!     .read(&key, || upstream.fetch(&casino_id))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod strategy;

// Re-export commonly used types
#[cfg(feature = "redis")]
pub use cache::CacheClient;
pub use cache::{
    connect, CacheConfig, CacheStore, CacheStoreExt, MemoryStore, SharedCacheStore,
};
pub use error::{CacheError, Result};
pub use strategy::{CacheAside, Lookup, ReadError};
