//! Explicit results for LLM replies that must decode as JSON.
//!
//! Callers that must always produce a value wrap the decode result in an
//! [`Outcome`], recording why a fallback was used instead of raising.

use llm_client::types::strip_code_blocks;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::traits::{CompletionRequest, Llm};

/// Why a reply could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The LLM call itself failed
    Transport,
    /// The reply was not JSON
    Parse,
    /// The reply was JSON of the wrong shape
    Schema,
    /// The reply was blank
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyError {
    pub kind: FailureKind,
    pub message: String,
}

impl ReplyError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// A value that is always usable, with the failure that forced a fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok {
        value: T,
    },
    Fallback {
        value: T,
        kind: FailureKind,
        message: String,
    },
}

impl<T> Outcome<T> {
    pub fn from_result(result: Result<T, ReplyError>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Outcome::Ok { value },
            Err(e) => Outcome::Fallback {
                value: fallback(),
                kind: e.kind,
                message: e.message,
            },
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok { value } | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Ok { value } | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn fallback_used(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    pub fn failure(&self) -> Option<(FailureKind, &str)> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Fallback { kind, message, .. } => Some((*kind, message.as_str())),
        }
    }
}

/// Send `request` and decode the reply as `T`.
pub async fn request_json<T: DeserializeOwned>(
    llm: &dyn Llm,
    request: CompletionRequest,
) -> Result<T, ReplyError> {
    let reply = llm.complete(request).await.map_err(|e| {
        warn!(error = %e, "LLM request failed");
        ReplyError::new(FailureKind::Transport, e.to_string())
    })?;
    decode_reply(&reply)
}

/// Decode a JSON reply, tolerating code fences and surrounding prose.
pub fn decode_reply<T: DeserializeOwned>(reply: &str) -> Result<T, ReplyError> {
    let body = strip_code_blocks(reply);
    if body.is_empty() {
        return Err(ReplyError::new(FailureKind::Empty, "empty reply"));
    }

    let value: Value = serde_json::from_str(body)
        .or_else(|e| embedded_json(body).ok_or(e))
        .map_err(|e| ReplyError::new(FailureKind::Parse, e.to_string()))?;

    serde_json::from_value(value).map_err(|e| ReplyError::new(FailureKind::Schema, e.to_string()))
}

/// The outermost `{...}` or `[...]` span of a reply with leading prose.
fn embedded_json(body: &str) -> Option<Value> {
    let start = body.find(['{', '['])?;
    let close = if body[start..].starts_with('{') { '}' } else { ']' };
    let end = body.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&body[start..=end]).ok()
}
