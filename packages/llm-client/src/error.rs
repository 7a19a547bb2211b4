//! Error types for the LLM client.

use thiserror::Error;

/// Result type for LLM client operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Provider answered 429
    #[error("Rate limited by provider")]
    RateLimited {
        /// Seconds the provider asked us to wait, if it said so
        retry_after: Option<u64>,
    },

    /// Non-2xx response other than 429
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl LlmError {
    /// Whether the request may succeed if sent again.
    ///
    /// Transport failures, timeouts, rate limiting and 5xx responses are
    /// transient; everything else is returned to the caller immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Config(_) | Self::Parse(_) => false,
        }
    }

    pub(crate) fn from_reqwest(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::Network(error.to_string())
        }
    }
}
