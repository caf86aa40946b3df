//! # Casino Data Proxy Server
//!
//! Binary entry point for the cache proxy service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casino_cache::CacheStore;
use casino_proxy::{build_router, ApiContext, Config, UpstreamClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(
        version = casino_proxy::VERSION,
        "Starting casino data proxy"
    );

    // The cache must be up before the listener accepts requests
    tracing::info!(url = %config.cache.url, "Connecting to cache");
    let cache = casino_cache::connect(&config.cache).await?;
    tracing::info!(backend = cache.backend(), "Cache connected");

    let upstream = UpstreamClient::new(&config.upstream)?;
    tracing::info!(
        base_url = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout.as_secs(),
        ttl_secs = config.cache.ttl.as_secs(),
        response_shape = config.response_shape.as_str(),
        "Upstream configured"
    );

    let api_ctx = ApiContext::new(
        cache.clone(),
        config.cache.clone(),
        upstream,
        config.response_shape,
    );
    let app = build_router(api_ctx);

    // Start server
    let addr = config.server_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight requests have drained; release the cache connection
    let backend = cache.backend();
    drop(cache);
    tracing::info!(backend, "Cache disconnected");

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
