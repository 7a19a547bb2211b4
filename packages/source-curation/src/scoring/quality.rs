//! Shared quality score used by every strategy and by rescoring.

const CREDIBILITY_WEIGHT: f64 = 0.30;
const RELEVANCE_WEIGHT: f64 = 0.35;
const COMPLETENESS_WEIGHT: f64 = 0.25;
const UNIQUENESS_WEIGHT: f64 = 0.10;

/// Quality on [0, 100].
///
/// `credibility` is on [0, 100]; `relevance`, `completeness` and
/// `uniqueness` are on [0, 1].
pub fn quality_score(credibility: f64, relevance: f64, completeness: f64, uniqueness: f64) -> f64 {
    let score = 100.0
        * (CREDIBILITY_WEIGHT * (credibility / 100.0).clamp(0.0, 1.0)
            + RELEVANCE_WEIGHT * relevance.clamp(0.0, 1.0)
            + COMPLETENESS_WEIGHT * completeness.clamp(0.0, 1.0)
            + UNIQUENESS_WEIGHT * uniqueness.clamp(0.0, 1.0));
    score.clamp(0.0, 100.0)
}
