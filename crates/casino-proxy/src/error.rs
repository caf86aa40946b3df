//! # API Error Types
//!
//! Unified error handling for the proxy's HTTP layer. Every error renders as
//! `{"detail": "<message>"}` with a status matching the failure class.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use casino_cache::{CacheError, ReadError};
use casino_domain::DomainError;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidIdentifier(#[from] DomainError),

    #[error("Error fetching data from upstream: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(UpstreamError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Upstream(UpstreamError::Transport(_) | UpstreamError::InvalidBody(_))
            | Self::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the caller
    fn detail(&self) -> String {
        match self {
            // cache internals and unreadable upstream bodies stay in the logs
            Self::Cache(_) | Self::Upstream(UpstreamError::InvalidBody(_)) => {
                "Internal Server Error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<ReadError<UpstreamError>> for ApiError {
    fn from(err: ReadError<UpstreamError>) -> Self {
        match err {
            ReadError::Cache(e) => Self::Cache(e),
            ReadError::Source(e) => Self::Upstream(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Cache(_) => tracing::error!(error = %self, "Cache failure"),
            Self::Upstream(_) => tracing::warn!(error = %self, %status, "Upstream failure"),
            Self::InvalidIdentifier(_) => tracing::debug!(error = %self, "Rejected identifier"),
        }

        let body = serde_json::json!({ "detail": self.detail() });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
