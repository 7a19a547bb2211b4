//! Credibility, relevance and quality scoring.

pub mod credibility;
pub mod quality;
pub mod relevance;

pub use credibility::{publication_year, recency_score, CredibilityAssessment, CredibilityScorer};
pub use quality::quality_score;
pub use relevance::{score_relevance, tfidf_cosine, tokenize, RelevanceBreakdown};
