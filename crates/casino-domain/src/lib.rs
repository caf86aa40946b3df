//! # Casino Data Proxy - Domain Model
//!
//! Value objects shared by the cache layer and the HTTP proxy: the external
//! casino identifier, the cache key derived from it, and the shape of the
//! payload returned to callers. These types do no I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default namespace for cache keys (`casino:{identifier}`)
pub const DEFAULT_KEY_PREFIX: &str = "casino";

/// Longest identifier accepted from callers, in bytes
pub const MAX_IDENTIFIER_LEN: usize = 128;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// External casino identifier supplied in the request path.
///
/// The identifier is used verbatim in both the cache key and the upstream
/// URL, so it is restricted to characters that are safe in a single path
/// segment: ASCII alphanumerics, `-`, `_` and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CasinoId(String);

impl CasinoId {
    /// Validate and wrap a raw identifier
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidIdentifier`] if the identifier is empty,
    /// too long, a dot segment, or contains characters outside the allowed set.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();

        let reason = if raw.is_empty() {
            Some("identifier must not be empty")
        } else if raw.len() > MAX_IDENTIFIER_LEN {
            Some("identifier is too long")
        } else if raw == "." || raw == ".." {
            Some("identifier must not be a dot segment")
        } else if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        {
            Some("identifier contains unsupported characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidIdentifier {
                id: raw,
                reason: reason.to_string(),
            }),
            None => Ok(Self(raw)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CasinoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CasinoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for CasinoId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Key under which a casino document is cached: `{prefix}:{identifier}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a casino under the given namespace prefix
    #[must_use]
    pub fn for_casino(prefix: &str, id: &CasinoId) -> Self {
        Self(format!("{prefix}:{id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// RESPONSE PAYLOAD
// =============================================================================

/// How a casino document is presented to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseShape {
    /// The upstream document exactly as received
    #[default]
    Raw,
    /// `{"identifier": ..., "data": <document>}`
    Envelope,
}

impl ResponseShape {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Envelope => "envelope",
        }
    }

    /// Render a document for the caller according to this shape
    #[must_use]
    pub fn render(self, id: &CasinoId, document: Value) -> Value {
        match self {
            Self::Raw => document,
            Self::Envelope => serde_json::json!({
                "identifier": id.as_str(),
                "data": document,
            }),
        }
    }
}

impl FromStr for ResponseShape {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "envelope" => Ok(Self::Envelope),
            other => Err(DomainError::UnknownResponseShape(other.to_string())),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid casino identifier '{id}': {reason}")]
    InvalidIdentifier { id: String, reason: String },

    #[error("Unknown response shape: {0} (expected 'raw' or 'envelope')")]
    UnknownResponseShape(String),
}
