//! # HTTP Handlers
//!
//! Cache-aside endpoint for casino documents plus health and fallback routes.

use axum::extract::{Path, State};
use axum::http::{header::HeaderName, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use casino_cache::{CacheAside, CacheStore};
use casino_domain::CasinoId;
use serde_json::json;

use crate::context::ApiContext;
use crate::error::ApiResult;

/// Reports whether a document was served from the cache
pub static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// `GET /_api/v1/get-data-casino/{identifier}/`
///
/// Looks the casino up in the cache; on a miss fetches it from upstream,
/// writes it back with the configured TTL and returns it.
pub async fn get_casino_data(
    State(ctx): State<ApiContext>,
    Path(identifier): Path<String>,
) -> ApiResult<Response> {
    let id = CasinoId::parse(identifier)?;
    let key = ctx.cache_config.key_for(&id);

    let lookup = CacheAside::new(ctx.cache.as_ref(), ctx.cache_config.ttl)
        .read(&key, || ctx.upstream.fetch(&id))
        .await?;

    tracing::debug!(casino_id = %id, cache = lookup.as_str(), "Serving casino data");

    let source = lookup.as_str();
    let body = ctx.response_shape.render(&id, lookup.into_inner());
    Ok(([(X_CACHE.clone(), source)], Json(body)).into_response())
}

/// `GET /_api/v1/get-data-casino/{identifier}` redirects to the canonical
/// trailing-slash route
pub async fn redirect_trailing_slash(Path(identifier): Path<String>) -> ApiResult<Redirect> {
    let id = CasinoId::parse(identifier)?;
    Ok(Redirect::temporary(&format!("/_api/v1/get-data-casino/{id}/")))
}

/// Health check endpoint
pub async fn health_check(State(ctx): State<ApiContext>) -> impl IntoResponse {
    let backend = ctx.cache.backend();
    match ctx.cache.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "cache": "up" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend, "Cache ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "cache": "down" })),
            )
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
