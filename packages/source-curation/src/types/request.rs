//! Inbound operation requests and their responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::CharacterProfile;
use super::source::SourceCandidate;
use super::validation::{ValidationAggregates, ValidationOptions, DEFAULT_MIN_CREDIBILITY, DEFAULT_MIN_RELEVANCE};
use crate::error::{CurationError, Result};
use crate::validation::structural::is_well_formed_url;

pub const DEFAULT_MIN_QUALITY: f64 = 85.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomaticRequest {
    pub subject: String,
    pub min_sources: usize,
    pub max_sources: usize,
    pub check_accessibility: bool,
    pub min_relevance: f64,
    pub min_credibility: f64,
    /// Accepted sources must also reach this rescored quality
    pub min_quality: f64,
}

impl Default for AutomaticRequest {
    fn default() -> Self {
        Self {
            subject: String::new(),
            min_sources: 40,
            max_sources: 60,
            check_accessibility: true,
            min_relevance: DEFAULT_MIN_RELEVANCE,
            min_credibility: DEFAULT_MIN_CREDIBILITY,
            min_quality: DEFAULT_MIN_QUALITY,
        }
    }
}

impl AutomaticRequest {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Default::default()
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            check_accessibility: self.check_accessibility,
            min_relevance: self.min_relevance,
            min_credibility: self.min_credibility,
            deep_analysis: false,
        }
    }

    pub fn check(&self) -> Result<()> {
        if self.max_sources == 0 {
            return Err(CurationError::invalid("max_sources", "must be positive"));
        }
        if self.min_sources > self.max_sources {
            return Err(CurationError::invalid(
                "min_sources",
                "must not exceed max_sources",
            ));
        }
        if !(0.0..=100.0).contains(&self.min_quality) {
            return Err(CurationError::invalid("min_quality", "must be between 0 and 100"));
        }
        self.validation_options().check()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationMetadata {
    pub candidates_discovered: usize,
    pub candidates_accepted: usize,
    /// Dropped by the learned-priority trim to stay within `max_sources`
    pub trimmed: usize,
    pub min_sources_met: bool,
    pub analysis_fallback_used: bool,
    pub elapsed_ms: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutomaticResponse {
    pub subject: String,
    pub sources: Vec<SourceCandidate>,
    pub profile: CharacterProfile,
    pub validation_summary: ValidationAggregates,
    pub strategies_used: Vec<String>,
    pub generation_metadata: GenerationMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridRequest {
    pub subject: String,
    pub user_urls: Vec<String>,
    pub auto_complete: bool,
    pub target_count: usize,
    pub check_accessibility: bool,
    pub min_relevance: f64,
    pub min_credibility: f64,
    pub provide_suggestions: bool,
    /// Discovery rounds allowed when filling `target_count`
    pub max_rounds: usize,
}

impl Default for HybridRequest {
    fn default() -> Self {
        Self {
            subject: String::new(),
            user_urls: Vec::new(),
            auto_complete: true,
            target_count: 50,
            check_accessibility: true,
            min_relevance: DEFAULT_MIN_RELEVANCE,
            min_credibility: DEFAULT_MIN_CREDIBILITY,
            provide_suggestions: true,
            max_rounds: 4,
        }
    }
}

impl HybridRequest {
    pub fn new(subject: impl Into<String>, user_urls: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            user_urls,
            ..Default::default()
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            check_accessibility: self.check_accessibility,
            min_relevance: self.min_relevance,
            min_credibility: self.min_credibility,
            deep_analysis: false,
        }
    }

    pub fn check(&self) -> Result<()> {
        if self.target_count == 0 {
            return Err(CurationError::invalid("target_count", "must be positive"));
        }
        if let Some(url) = self.user_urls.iter().find(|u| !is_well_formed_url(u)) {
            return Err(CurationError::invalid(
                "user_urls",
                format!("malformed URL: {}", url),
            ));
        }
        self.validation_options().check()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    TargetUnmet,
    AcademicSource,
    GovernmentArchive,
    Diversify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    pub relevance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HybridMetadata {
    pub target_met: bool,
    pub discovery_rounds: usize,
    pub candidates_discovered: usize,
    /// User URLs that were kept despite failing a threshold
    pub user_warnings: Vec<String>,
    pub duplicates_of_user_urls: usize,
    pub elapsed_ms: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HybridResponse {
    pub subject: String,
    pub sources: Vec<SourceCandidate>,
    pub user_source_count: usize,
    pub auto_generated_count: usize,
    pub suggestions: Vec<Suggestion>,
    pub validation_summary: ValidationAggregates,
    pub configuration: HybridRequest,
    pub metadata: HybridMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_automatic_defaults_from_partial_json() {
        let request: AutomaticRequest =
            serde_json::from_str(r#"{"subject": "Albert Einstein"}"#).unwrap();
        assert_eq!(request.min_sources, 40);
        assert_eq!(request.max_sources, 60);
        assert_eq!(request.min_quality, 85.0);
        assert!(request.check().is_ok());
    }

    #[test]
    fn test_automatic_rejects_inverted_bounds() {
        let request = AutomaticRequest {
            min_sources: 70,
            ..AutomaticRequest::new("Albert Einstein")
        };
        let err = request.check().unwrap_err();
        assert!(matches!(err, CurationError::InvalidInput { ref field, .. } if field == "min_sources"));
    }

    #[test]
    fn test_hybrid_defaults() {
        let request = HybridRequest::new("Albert Einstein", vec!["https://example.com".into()]);
        assert!(request.auto_complete);
        assert_eq!(request.target_count, 50);
        assert_eq!(request.max_rounds, 4);

        let zero = HybridRequest {
            target_count: 0,
            ..request
        };
        assert!(zero.check().is_err());

        let malformed = HybridRequest::new("Albert Einstein", vec!["not a url".into()]);
        let err = malformed.check().unwrap_err();
        assert!(matches!(err, CurationError::InvalidInput { ref field, .. } if field == "user_urls"));
    }
}
