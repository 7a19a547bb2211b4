//! Data types shared across the pipeline.

pub mod content;
pub mod cross;
pub mod feedback;
pub mod profile;
pub mod request;
pub mod source;
pub mod subject;
pub mod validation;

pub use content::{ContentQualityScore, DimensionScore};
pub use cross::{
    AcademicAssessment, ConsistencyMethod, CrossValidationMetadata, DiversityBreakdown,
    TemporalAnalysis, ValidationResult,
};
pub use feedback::{
    AggregatedPattern, BiographyQuality, Dashboard, FeedbackRecommendations, ImprovementMetrics,
    PatternKind, QualityWeights, SuccessCase, SuccessPattern, TimeSeriesPoint,
};
pub use profile::{CharacterProfile, ProfileReply};
pub use request::{
    AutomaticRequest, AutomaticResponse, GenerationMetadata, HybridMetadata, HybridRequest,
    HybridResponse, Suggestion, SuggestionKind,
};
pub use source::{host_of, Metadata, SourceCandidate, SourceItem, SourceKind};
pub use subject::Subject;
pub use validation::{
    AdvancedValidationResponse, SourceValidation, ValidationAggregates, ValidationOptions,
};
