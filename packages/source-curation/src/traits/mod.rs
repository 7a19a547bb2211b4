//! Seams between the pipeline and the outside world.
//!
//! The pipeline only talks to an LLM, to web pages and to discovery
//! strategies through these traits; tests substitute the mocks in
//! [`crate::testing`].

pub mod fetcher;
pub mod llm;
pub mod strategy;

pub use fetcher::{FetchedPage, PageFetcher};
pub use llm::{CompletionRequest, Llm};
pub use strategy::SourceStrategy;
