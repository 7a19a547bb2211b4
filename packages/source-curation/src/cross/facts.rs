//! Fact extraction and pairwise consistency scoring.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::ai::{request_json, Outcome};
use crate::scoring::tokenize;
use crate::traits::{CompletionRequest, Llm};
use crate::types::Subject;

pub const MAX_FACTS_PER_SOURCE: usize = 10;
/// Characters of source text sent for fact extraction.
const EXTRACTION_EXCERPT_CHARS: usize = 6000;

const EXTRACTION_SYSTEM: &str = "You extract key biographical facts from a source text. \
    Reply ONLY with a JSON array of at most 10 objects: \
    [{\"fact\": \"<short factual statement>\", \"confidence\": <number 0-1>, \
    \"category\": \"birth|education|career|family|achievement|death|legacy|other\"}]";

const COMPARISON_SYSTEM: &str = "You compare two lists of biographical facts about the same \
    person and judge whether they are consistent with each other. Facts that are merely \
    different are not contradictions. Reply ONLY with JSON: {\"score\": <number 0-1>} where \
    1 means fully consistent and 0 means directly contradictory.";

/// One extracted claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFact {
    pub fact: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct ComparisonReply {
    score: f64,
}

/// Up to ten facts from one source's text; empty on any failure.
pub async fn extract_facts(llm: &dyn Llm, subject: &Subject, content: &str) -> Outcome<Vec<KeyFact>> {
    let excerpt: String = content.chars().take(EXTRACTION_EXCERPT_CHARS).collect();
    let request = CompletionRequest::json(
        EXTRACTION_SYSTEM,
        format!("Person: {}\n\nSource text:\n{}", subject, excerpt),
    )
    .with_max_tokens(1200);

    let result = request_json::<Vec<KeyFact>>(llm, request).await.map(|facts| {
        facts
            .into_iter()
            .filter(|f| !f.fact.trim().is_empty())
            .take(MAX_FACTS_PER_SOURCE)
            .collect()
    });
    let outcome = Outcome::from_result(result, Vec::new);
    if let Some((kind, message)) = outcome.failure() {
        warn!(subject = %subject, ?kind, error = %message, "Fact extraction failed");
    }
    outcome
}

/// Consistency of two sources on [0, 1].
///
/// Asks the model to compare the fact lists; falls back to word-set overlap
/// of `text_a` and `text_b` when the reply is unusable. The flag is `true`
/// when the fallback was used.
pub async fn compare(
    llm: &dyn Llm,
    subject: &Subject,
    facts_a: &[KeyFact],
    facts_b: &[KeyFact],
    text_a: &str,
    text_b: &str,
) -> (f64, bool) {
    if facts_a.is_empty() || facts_b.is_empty() {
        return (jaccard(text_a, text_b), true);
    }

    let listing = |facts: &[KeyFact]| {
        facts
            .iter()
            .map(|f| format!("- {}", f.fact))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let request = CompletionRequest::json(
        COMPARISON_SYSTEM,
        format!(
            "Person: {}\n\nSource A facts:\n{}\n\nSource B facts:\n{}",
            subject,
            listing(facts_a),
            listing(facts_b)
        ),
    )
    .with_max_tokens(100);

    match request_json::<ComparisonReply>(llm, request).await {
        Ok(reply) if reply.score.is_finite() => (reply.score.clamp(0.0, 1.0), false),
        Ok(reply) => {
            warn!(score = reply.score, "Non-finite comparison score; using word overlap");
            (jaccard(text_a, text_b), true)
        }
        Err(e) => {
            warn!(kind = ?e.kind, error = %e.message, "Fact comparison failed; using word overlap");
            (jaccard(text_a, text_b), true)
        }
    }
}

/// Jaccard index of the two texts' token sets.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a: HashSet<String> = tokenize(a).into_iter().collect();
    let b: HashSet<String> = tokenize(b).into_iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
