//! Cross-source validation of an accepted set.
//!
//! Scores the set as a whole: factual consistency between sources, coverage of
//! the subject's life periods, diversity, domain redundancy and academic
//! compliance, then blends them into one overall quality.

pub mod coverage;
pub mod facts;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};

use crate::scoring::CredibilityScorer;
use crate::traits::Llm;
use crate::types::{
    ConsistencyMethod, CrossValidationMetadata, SourceCandidate, Subject, ValidationResult,
};

pub use coverage::{academic_compliance, diversity, missing_periods, redundancy, temporal_analysis};
pub use facts::{compare, extract_facts, jaccard, KeyFact};

/// Sources whose facts enter the consistency matrix.
pub const MAX_FACT_SOURCES: usize = 10;
/// Consistency when fewer than two sources carry content.
pub const DEFAULT_CONSISTENCY: f64 = 0.5;
/// Sources below this count draw a triangulation recommendation.
pub const MIN_TRIANGULATION_SOURCES: usize = 10;
const MAX_CONCURRENT_COMPARISONS: usize = 4;

pub const CONSISTENT_SET_RECOMMENDATION: &str =
    "Source set is consistent, diverse and covers the subject's whole life";

#[derive(Clone)]
pub struct CrossValidator {
    llm: Arc<dyn Llm>,
    scorer: CredibilityScorer,
}

impl CrossValidator {
    pub fn new(llm: Arc<dyn Llm>, scorer: CredibilityScorer) -> Self {
        Self { llm, scorer }
    }

    pub async fn validate_set(&self, sources: &[SourceCandidate], subject: &Subject) -> ValidationResult {
        if sources.is_empty() {
            return ValidationResult::empty();
        }

        let (consistency, mut metadata) = self.consistency(sources, subject).await;

        let temporal = temporal_analysis(sources.iter().filter_map(SourceCandidate::content));
        let temporal_coverage = temporal.score();
        let (diversity_score, diversity_breakdown) = diversity(sources);
        let (redundancy_level, shared_domains) = redundancy(sources);
        let (academic, assessment) = academic_compliance(sources, |s| {
            s.credibility_score
                .unwrap_or_else(|| self.scorer.assess(&s.item).overall)
        });

        let overall = 0.30 * consistency
            + 0.20 * temporal_coverage
            + 0.20 * diversity_score
            + 0.15 * (1.0 - redundancy_level)
            + 0.15 * academic;

        metadata.source_count = sources.len();
        metadata.temporal_analysis = temporal;
        metadata.diversity = diversity_breakdown;
        metadata.academic = assessment;
        metadata.shared_domains = shared_domains;

        let mut result = ValidationResult {
            consistency_score: consistency,
            temporal_coverage,
            diversity_score,
            redundancy_level,
            academic_compliance: academic,
            overall_quality: overall.clamp(0.0, 1.0),
            recommendations: Vec::new(),
            metadata,
        };
        result.recommendations = recommendations(&result);

        info!(
            subject = %subject,
            sources = sources.len(),
            overall = result.overall_quality,
            consistency = result.consistency_score,
            "Cross-validation complete"
        );
        result
    }

    /// Mean of the upper triangle of the pairwise consistency matrix.
    async fn consistency(
        &self,
        sources: &[SourceCandidate],
        subject: &Subject,
    ) -> (f64, CrossValidationMetadata) {
        let texts: Vec<&str> = sources
            .iter()
            .filter_map(SourceCandidate::content)
            .take(MAX_FACT_SOURCES)
            .collect();

        let mut metadata = CrossValidationMetadata {
            analyzed_sources: texts.len(),
            ..Default::default()
        };
        if texts.len() < 2 {
            debug!(with_content = texts.len(), "Too few sources for a consistency matrix");
            return (DEFAULT_CONSISTENCY, metadata);
        }

        let llm = self.llm.as_ref();
        let facts: Vec<Vec<KeyFact>> = join_all(
            texts.iter().map(|text| extract_facts(llm, subject, text)),
        )
        .await
        .into_iter()
        .map(|outcome| outcome.into_value())
        .collect();

        let pairs: Vec<(usize, usize)> = (0..texts.len())
            .flat_map(|i| (i + 1..texts.len()).map(move |j| (i, j)))
            .collect();
        let scores: Vec<(f64, bool)> = stream::iter(pairs.into_iter().map(|(i, j)| {
            compare(llm, subject, &facts[i], &facts[j], texts[i], texts[j])
        }))
        .buffered(MAX_CONCURRENT_COMPARISONS)
        .collect()
        .await;

        metadata.consistency_method = ConsistencyMethod::Pairwise;
        metadata.overlap_fallback_pairs = scores.iter().filter(|(_, fallback)| *fallback).count();
        let mean = scores.iter().map(|(score, _)| score).sum::<f64>() / scores.len() as f64;
        (mean.clamp(0.0, 1.0), metadata)
    }
}

/// Advice for each weak measure, or one positive note.
pub fn recommendations(result: &ValidationResult) -> Vec<String> {
    let mut out = Vec::new();

    if result.consistency_score < 0.8 {
        out.push(format!(
            "Factual consistency is {:.2}; reconcile conflicting claims against primary sources",
            result.consistency_score
        ));
    }
    if result.temporal_coverage < 0.7 {
        out.push(format!(
            "Temporal coverage is {:.2}; add sources covering {}",
            result.temporal_coverage,
            missing_periods(&result.metadata.temporal_analysis).join(", ")
        ));
    }
    if result.diversity_score < 0.5 {
        out.push(format!(
            "Diversity is {:.2}; draw on more source types, domains and authors",
            result.diversity_score
        ));
    }
    if result.redundancy_level > 0.3 {
        out.push(format!(
            "Redundancy is {:.2}; {} supply several sources each, replace some with independent domains",
            result.redundancy_level,
            result.metadata.shared_domains.join(", ")
        ));
    }
    if result.metadata.source_count < MIN_TRIANGULATION_SOURCES {
        out.push(format!(
            "Only {} sources; at least {} are needed to triangulate claims",
            result.metadata.source_count, MIN_TRIANGULATION_SOURCES
        ));
    }

    if out.is_empty() {
        out.push(CONSISTENT_SET_RECOMMENDATION.to_string());
    }
    out
}
