//! Typed errors for the curation library.
//!
//! Failures inside the pipeline are localized per candidate and per strategy;
//! only the variants below ever reach a caller.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Pipeline stage, named in user-facing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analysis,
    Discovery,
    Validation,
    CrossValidation,
    Feedback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Analysis => "character analysis",
            Stage::Discovery => "source discovery",
            Stage::Validation => "validation",
            Stage::CrossValidation => "cross-validation",
            Stage::Feedback => "quality feedback",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by curation operations.
#[derive(Debug, Error)]
pub enum CurationError {
    /// Caller input rejected; `field` names the offending input
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// LLM call failed after the client's own retries
    #[error("LLM error: {0}")]
    Llm(#[from] llm_client::LlmError),

    /// Outbound page fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A discovery strategy failed
    #[error("strategy {strategy} failed: {message}")]
    Strategy { strategy: String, message: String },

    /// Feedback store I/O failed
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Startup configuration is missing or invalid
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization failed
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A stage left nothing to work with
    #[error("{stage} produced no sources: {reason}")]
    NoSources { stage: Stage, reason: String },
}

impl CurationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn strategy(strategy: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Strategy {
            strategy: strategy.into(),
            message: message.to_string(),
        }
    }
}

/// Errors from fetching a candidate page.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// Errors reading startup configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(String),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Result type alias for curation operations.
pub type Result<T> = std::result::Result<T, CurationError>;

/// Result type alias for page fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
