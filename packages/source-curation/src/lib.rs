//! Curated Research Sources for Biographies
//!
//! Given the name of a historical figure, this library assembles a validated
//! and ranked set of research sources for a biography.
//!
//! # Pipeline
//!
//! 1. [`analyzer`] turns the bare name into a [`CharacterProfile`] with one
//!    LLM call, falling back to a minimal profile when the call fails.
//! 2. [`strategies`] picks the discovery strategies the profile warrants
//!    (Wikipedia, field-specific catalogs, national archives, news,
//!    international organizations) and [`discovery`] runs them concurrently.
//! 3. [`validation`] checks structure, fetches each page, measures relevance
//!    and credibility and filters by the caller's thresholds.
//! 4. [`cross`] scores an accepted set as a whole: factual consistency,
//!    coverage of the subject's life, diversity and redundancy.
//! 5. [`feedback`] learns which source features accompany good biographies
//!    and feeds domain priorities back into ranking.
//!
//! # Usage
//!
//! ```rust,ignore
//! use source_curation::{CurationConfig, CurationPipeline, HybridRequest};
//!
//! let pipeline = CurationPipeline::from_config(&CurationConfig::from_env()?)?;
//! let response = pipeline
//!     .generate_hybrid(HybridRequest::new(
//!         "Albert Einstein",
//!         vec!["https://www.nobelprize.org/prizes/physics/1921/einstein/biographical/".into()],
//!     ))
//!     .await?;
//! println!("{} sources, target met: {}", response.sources.len(), response.metadata.target_met);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams to the LLM, the web and discovery strategies
//! - [`types`] - Subjects, profiles, candidates and every report type
//! - [`registry`] - Premium domain registry
//! - [`scoring`] - Credibility, relevance and quality formulas
//! - [`pipeline`] - The inbound operations
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod analyzer;
pub mod config;
pub mod cross;
pub mod discovery;
pub mod error;
pub mod feedback;
pub mod fetch;
pub mod pipeline;
pub mod registry;
pub mod scoring;
pub mod security;
pub mod strategies;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validation;

pub use ai::{FailureKind, Outcome};
pub use analyzer::CharacterAnalyzer;
pub use config::CurationConfig;
pub use cross::CrossValidator;
pub use discovery::{DiscoveryReport, SourceDiscovery};
pub use error::{ConfigError, CurationError, FetchError, Result, Stage};
pub use feedback::FeedbackStore;
pub use fetch::HttpFetcher;
pub use pipeline::CurationPipeline;
pub use registry::{DomainEntry, DomainRegistry, SourceCategory};
pub use scoring::{quality_score, score_relevance, CredibilityScorer};
pub use strategies::{StrategyDispatcher, TemplateStrategy, WikipediaStrategy};
pub use traits::{CompletionRequest, FetchedPage, Llm, PageFetcher, SourceStrategy};
pub use types::{
    AdvancedValidationResponse, AutomaticRequest, AutomaticResponse, BiographyQuality,
    CharacterProfile, ContentQualityScore, Dashboard, FeedbackRecommendations, HybridRequest,
    HybridResponse, ImprovementMetrics, SourceCandidate, SourceItem, SourceKind, Subject,
    SuccessCase, ValidationOptions, ValidationResult,
};
pub use validation::{ContentAnalyzer, Validator};
