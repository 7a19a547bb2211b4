//! Records kept by the quality-feedback store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Threshold above which a biography counts as a success.
pub const SUCCESS_THRESHOLD: f64 = 85.0;

/// Family a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Domain,
    SourceType,
    QualityThreshold,
    Metadata,
}

/// A feature repeated across one run's sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessPattern {
    pub kind: PatternKind,
    pub value: String,
    pub frequency: usize,
    /// Overall score of the biography the run produced
    pub avg_quality_impact: f64,
    /// `frequency / |sources|`, capped at 1
    pub confidence: f64,
}

/// One learned run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessCase {
    pub character: String,
    pub quality_score: f64,
    pub source_count: usize,
    pub patterns: Vec<SuccessPattern>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Quality report of a generated biography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiographyQuality {
    pub overall_score: f64,
    /// Any further per-dimension scores
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl BiographyQuality {
    pub fn new(overall_score: f64) -> Self {
        Self {
            overall_score,
            details: Map::new(),
        }
    }
}

/// Scoring weights; always normalized to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub domain_authority: f64,
    pub content_quality: f64,
    pub source_type: f64,
    pub recency: f64,
    pub citations: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            domain_authority: 0.30,
            content_quality: 0.25,
            source_type: 0.20,
            recency: 0.10,
            citations: 0.15,
        }
    }
}

impl QualityWeights {
    pub fn sum(&self) -> f64 {
        self.domain_authority + self.content_quality + self.source_type + self.recency + self.citations
    }

    /// Rescale so the weights sum to 1.
    pub fn normalize(&mut self) {
        let total = self.sum();
        if total <= 0.0 || !total.is_finite() {
            *self = Self::default();
            return;
        }
        self.domain_authority /= total;
        self.content_quality /= total;
        self.source_type /= total;
        self.recency /= total;
        self.citations /= total;
    }
}

/// A pattern aggregated across cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPattern {
    pub kind: PatternKind,
    pub value: String,
    /// Cases the pattern appeared in
    pub occurrences: usize,
    pub avg_quality_impact: f64,
    pub confidence: f64,
}

impl AggregatedPattern {
    pub fn rank(&self) -> f64 {
        self.avg_quality_impact * self.confidence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementMetrics {
    pub total_cases: usize,
    /// Cases inside the lookback window
    pub recent_cases: usize,
    pub lookback_days: i64,
    pub average_quality: f64,
    /// Recent mean minus older mean; 0 with fewer than 10 cases
    pub trend: f64,
    /// Share of recent cases scoring at least 85
    pub success_rate: f64,
    pub patterns_identified: usize,
    pub top_patterns: Vec<AggregatedPattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecommendations {
    pub priority_domains: BTreeMap<String, f64>,
    pub priority_source_types: BTreeMap<String, f64>,
    pub quality_weights: QualityWeights,
    pub top_patterns: Vec<AggregatedPattern>,
    pub success_rate: f64,
    pub trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub cases: usize,
    pub mean_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub metrics: ImprovementMetrics,
    pub time_series: Vec<TimeSeriesPoint>,
    pub recommendations: FeedbackRecommendations,
    pub total_cases: usize,
    pub generated_at: DateTime<Utc>,
}
