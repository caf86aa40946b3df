//! # Strategy Module
//!
//! Cache access strategies layered over a [`CacheStore`](crate::cache::CacheStore).
//!
//! ## Example
//!
//! ```rust,ignore
//! use casino_cache::strategy::CacheAside;
//!
//! let reader = CacheAside::new(store.as_ref(), config.ttl);
//! let lookup = reader.read(&key, || upstream.fetch(&id)).await?;
//! ```

pub mod cache_aside;

pub use cache_aside::{CacheAside, Lookup, ReadError};
