//! # Casino Data Proxy
//!
//! Read-through cache proxy in front of the casino data provider.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                          │
//! │     GET /_api/v1/get-data-casino/{identifier}/  /health      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ApiContext                                │
//! │        (cache handle, upstream client, response shape)       │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     Redis Cache         │   │     Upstream provider        │
//! │  casino:{id}, 1h TTL    │   │  (source of truth, 10s cap)  │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod upstream;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError, UpstreamConfig};
pub use context::ApiContext;
pub use error::{ApiError, ApiResult};
pub use upstream::{UpstreamClient, UpstreamError};

/// Canonical casino data route
pub const CASINO_DATA_PATH: &str = "/_api/v1/get-data-casino/{identifier}/";

/// Build the Axum router
pub fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route(CASINO_DATA_PATH, get(handlers::get_casino_data))
        .route(
            "/_api/v1/get-data-casino/{identifier}",
            get(handlers::redirect_trailing_slash),
        )
        // Health check
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        // State and middleware
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
