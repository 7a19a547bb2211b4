//! Per-candidate validation results and their aggregates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::content::ContentQualityScore;
use super::source::SourceCandidate;
use crate::error::{CurationError, Result};
use crate::scoring::CredibilityAssessment;

pub const DEFAULT_MIN_RELEVANCE: f64 = 0.7;
pub const DEFAULT_MIN_CREDIBILITY: f64 = 80.0;

/// Thresholds and switches for candidate validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Fetch every URL; unreachable pages are rejected
    pub check_accessibility: bool,
    pub min_relevance: f64,
    pub min_credibility: f64,
    /// Ask the LLM for depth, accuracy and bias scores of each fetched page
    pub deep_analysis: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_accessibility: true,
            min_relevance: DEFAULT_MIN_RELEVANCE,
            min_credibility: DEFAULT_MIN_CREDIBILITY,
            deep_analysis: false,
        }
    }
}

impl ValidationOptions {
    pub fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_relevance) {
            return Err(CurationError::invalid(
                "min_relevance",
                "must be between 0 and 1",
            ));
        }
        if !(0.0..=100.0).contains(&self.min_credibility) {
            return Err(CurationError::invalid(
                "min_credibility",
                "must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

/// Outcome of validating one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SourceValidation {
    /// The candidate with measured scores written back
    pub source: SourceCandidate,
    /// Structural checks passed
    pub valid: bool,
    /// `None` when accessibility was not checked
    pub accessible: Option<bool>,
    pub accepted: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub credibility: CredibilityAssessment,
    /// `None` when no content was fetched
    pub relevance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_quality: Option<ContentQualityScore>,
}

impl SourceValidation {
    pub fn is_trusted(&self) -> bool {
        self.credibility.overall >= DEFAULT_MIN_CREDIBILITY
    }
}

/// Counts and means over a validation batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationAggregates {
    pub total_sources: usize,
    pub valid_sources: usize,
    pub invalid_sources: usize,
    /// Structurally valid but below a threshold or unreachable
    pub rejected_sources: usize,
    pub accepted_sources: usize,
    pub average_relevance: Option<f64>,
    pub average_credibility: f64,
    pub categories: BTreeMap<String, usize>,
    pub trusted_sources: usize,
    pub untrusted_sources: usize,
    pub inaccessible_sources: usize,
}

/// Full response of an advanced validation run.
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedValidationResponse {
    pub subject: String,
    pub results: Vec<SourceValidation>,
    pub summary: ValidationAggregates,
    pub recommendations: Vec<String>,
}

impl AdvancedValidationResponse {
    /// Accepted candidates in input order.
    pub fn accepted(&self) -> impl Iterator<Item = &SourceCandidate> {
        self.results.iter().filter(|r| r.accepted).map(|r| &r.source)
    }
}
