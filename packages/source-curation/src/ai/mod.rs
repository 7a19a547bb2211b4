//! LLM plumbing: the [`Llm`](crate::traits::Llm) implementation over
//! `llm-client` and explicit outcomes for JSON replies.

pub mod client;
pub mod outcome;

pub use outcome::{decode_reply, request_json, FailureKind, Outcome, ReplyError};
