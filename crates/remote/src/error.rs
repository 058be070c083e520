//! Typed error enum for the remote crate.

use std::time::Duration;

use thiserror::Error;

/// Errors from remote instance API operations.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("rate limited by {source_name}")]
    RateLimited {
        /// Instance domain, or "local budget" when the client's own limiter refused
        source_name: String,
        /// Server hint for when the budget replenishes
        retry_after: Option<Duration>,
    },
    #[error("rate limit still exhausted after {attempts} attempts, last error: {last}")]
    RateLimitExhausted { attempts: u32, last: Box<RemoteError> },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("invalid rate limit: {0}")]
    InvalidRateLimit(String),
}

impl RemoteError {
    /// Whether the call should be retried once the budget replenishes.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::HttpStatus { code, .. } => *code == 429,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { code: 404 | 410, .. })
    }

    /// Server-provided wait hint, when the error carries one.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
