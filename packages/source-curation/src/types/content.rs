//! Deep content analysis scores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score assigned when a page has no analyzable content.
pub const UNAVAILABLE_SCORE: f64 = 0.3;
/// Score assigned to a dimension whose reply could not be parsed.
pub const UNPARSED_DIMENSION_SCORE: f64 = 0.5;

/// One analyzed dimension (depth, accuracy or neutrality) on [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: f64,
    /// Weighted sub-scores the dimension was computed from
    pub components: BTreeMap<String, f64>,
    pub justification: String,
    /// Set when the score is a default rather than a model judgement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl DimensionScore {
    pub fn fixed(score: f64, justification: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            score,
            components: BTreeMap::new(),
            justification: justification.into(),
            fallback: Some(reason.into()),
        }
    }
}

/// Depth, factual accuracy and bias of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentQualityScore {
    pub url: Option<String>,
    pub biographical_depth: DimensionScore,
    pub factual_accuracy: DimensionScore,
    /// Higher is more neutral
    pub neutrality: DimensionScore,
    pub overall_score: f64,
    pub fallback_used: bool,
    /// Characters of page text sent for analysis
    pub content_length: usize,
}

impl ContentQualityScore {
    /// Default result for empty or unreachable content.
    pub fn unavailable(url: Option<String>, reason: &str) -> Self {
        let dimension = || {
            DimensionScore::fixed(
                UNAVAILABLE_SCORE,
                "No analyzable content",
                reason.to_string(),
            )
        };
        Self {
            url,
            biographical_depth: dimension(),
            factual_accuracy: dimension(),
            neutrality: dimension(),
            overall_score: UNAVAILABLE_SCORE,
            fallback_used: true,
            content_length: 0,
        }
    }
}
