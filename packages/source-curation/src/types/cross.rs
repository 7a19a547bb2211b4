//! Cross-source validation result.

use serde::{Deserialize, Serialize};

/// Life periods checked for temporal coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalAnalysis {
    pub early_life: bool,
    pub career: bool,
    pub later_years: bool,
    pub legacy: bool,
}

impl TemporalAnalysis {
    pub fn covered(&self) -> usize {
        [self.early_life, self.career, self.later_years, self.legacy]
            .iter()
            .filter(|c| **c)
            .count()
    }

    pub fn score(&self) -> f64 {
        self.covered() as f64 / 4.0
    }
}

/// How the consistency score was obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyMethod {
    /// Pairwise model comparisons (possibly with some word-overlap fallbacks)
    Pairwise,
    /// Fewer than two sources carried content
    #[default]
    Default,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiversityBreakdown {
    pub source_type: f64,
    pub domain: f64,
    pub author: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicAssessment {
    pub academic_share: f64,
    pub mean_credibility: f64,
    pub peer_reviewed_count: usize,
    pub primary_source_count: usize,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationMetadata {
    pub source_count: usize,
    /// Sources whose facts entered the consistency matrix
    pub analyzed_sources: usize,
    pub consistency_method: ConsistencyMethod,
    /// Pairs scored by word overlap because the model reply was unusable
    pub overlap_fallback_pairs: usize,
    pub temporal_analysis: TemporalAnalysis,
    pub diversity: DiversityBreakdown,
    pub academic: AcademicAssessment,
    pub shared_domains: Vec<String>,
}

/// Set-level guarantees over accepted sources; every score is on [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub consistency_score: f64,
    pub temporal_coverage: f64,
    pub diversity_score: f64,
    pub redundancy_level: f64,
    pub academic_compliance: f64,
    pub overall_quality: f64,
    pub recommendations: Vec<String>,
    pub metadata: CrossValidationMetadata,
}

impl ValidationResult {
    pub fn empty() -> Self {
        Self {
            recommendations: vec![
                "No sources provided; add sources before cross-validation".to_string(),
            ],
            ..Default::default()
        }
    }
}
