//! # API Context
//!
//! Application state injected into every request handler.

use std::sync::Arc;

use casino_cache::{CacheConfig, SharedCacheStore};
use casino_domain::ResponseShape;

use crate::upstream::UpstreamClient;

/// Application context shared across all handlers
#[derive(Clone)]
pub struct ApiContext {
    /// Cache store opened at startup
    pub cache: SharedCacheStore,

    /// Entry lifetime and key namespace
    pub cache_config: Arc<CacheConfig>,

    /// Upstream provider client
    pub upstream: UpstreamClient,

    /// Raw document or identifier envelope
    pub response_shape: ResponseShape,
}

impl ApiContext {
    pub fn new(
        cache: SharedCacheStore,
        cache_config: CacheConfig,
        upstream: UpstreamClient,
        response_shape: ResponseShape,
    ) -> Self {
        Self {
            cache,
            cache_config: Arc::new(cache_config),
            upstream,
            response_shape,
        }
    }
}
