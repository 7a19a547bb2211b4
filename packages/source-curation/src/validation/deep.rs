//! Deep content analysis: biographical depth, factual accuracy and
//! neutrality, each scored by one low-temperature LLM call.
//!
//! A dimension whose reply cannot be used gets a fixed score and a
//! justification naming the failure; the analysis as a whole never fails.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ai::{request_json, FailureKind, ReplyError};
use crate::traits::{CompletionRequest, Llm};
use crate::types::content::UNPARSED_DIMENSION_SCORE;
use crate::types::{ContentQualityScore, DimensionScore, Subject};

/// Characters of page text sent to the model unless the caller asks for more.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 10_000;

const ANALYSIS_TEMPERATURE: f32 = 0.2;
const ANALYSIS_MAX_TOKENS: u32 = 600;

const DEPTH_WEIGHT: f64 = 0.4;
const ACCURACY_WEIGHT: f64 = 0.35;
const NEUTRALITY_WEIGHT: f64 = 0.25;

/// One scored dimension: what to ask and how to weigh the answer.
struct Dimension {
    label: &'static str,
    question: &'static str,
    components: &'static [(&'static str, f64)],
}

const DEPTH: Dimension = Dimension {
    label: "biographical depth",
    question: "How thoroughly does the text cover the person's life?",
    components: &[("coverage", 0.4), ("detail", 0.35), ("context", 0.25)],
};

const ACCURACY: Dimension = Dimension {
    label: "factual accuracy",
    question: "How accurate and verifiable are the factual claims about the person?",
    components: &[("accuracy", 0.5), ("verifiability", 0.3), ("citations", 0.2)],
};

const NEUTRALITY: Dimension = Dimension {
    label: "neutrality",
    question: "How neutral and balanced is the text? 1 means no detectable bias.",
    components: &[("neutrality", 0.5), ("balance", 0.3), ("tone", 0.2)],
};

#[derive(Debug, Deserialize)]
struct DimensionReply {
    #[serde(default)]
    justification: Option<String>,
    #[serde(flatten)]
    scores: BTreeMap<String, Value>,
}

impl Dimension {
    fn system_prompt(&self) -> String {
        let keys: Vec<String> = self
            .components
            .iter()
            .map(|(key, _)| format!("\"{}\": <number 0-1>", key))
            .collect();
        format!(
            "You assess sources for a biography. Rate the {} of the text the user provides. {}\n\
             Reply ONLY with JSON: {{{}, \"justification\": \"<one sentence>\"}}",
            self.label,
            self.question,
            keys.join(", ")
        )
    }

    fn score(&self, reply: DimensionReply) -> Result<DimensionScore, ReplyError> {
        let mut components = BTreeMap::new();
        let mut score = 0.0;
        for (key, weight) in self.components {
            let value = reply.scores.get(*key).and_then(Value::as_f64).ok_or_else(|| {
                ReplyError::new(FailureKind::Schema, format!("missing numeric '{}'", key))
            })?;
            let value = value.clamp(0.0, 1.0);
            score += weight * value;
            components.insert(key.to_string(), value);
        }
        Ok(DimensionScore {
            score: score.clamp(0.0, 1.0),
            components,
            justification: reply.justification.unwrap_or_default(),
            fallback: None,
        })
    }

    fn fallback(&self, kind: FailureKind, message: &str) -> DimensionScore {
        DimensionScore::fixed(
            UNPARSED_DIMENSION_SCORE,
            format!("{} could not be assessed ({:?}); default score applied", self.label, kind),
            message.to_string(),
        )
    }
}

/// LLM-backed content scorer.
#[derive(Clone)]
pub struct ContentAnalyzer {
    llm: Arc<dyn Llm>,
}

impl ContentAnalyzer {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// Score the first `max_length` characters of `content` (already cleaned
    /// page text) about `subject`.
    pub async fn analyze(
        &self,
        subject: &Subject,
        url: Option<&str>,
        content: &str,
        max_length: usize,
    ) -> ContentQualityScore {
        let content = content.trim();
        if content.is_empty() {
            debug!(url = url.unwrap_or("-"), "No content to analyze");
            return ContentQualityScore::unavailable(url.map(str::to_string), "empty content");
        }
        let excerpt: String = content.chars().take(max_length).collect();

        let (depth, accuracy, neutrality) = futures::join!(
            self.dimension(&DEPTH, subject, &excerpt),
            self.dimension(&ACCURACY, subject, &excerpt),
            self.dimension(&NEUTRALITY, subject, &excerpt),
        );

        let fallback_used = [&depth, &accuracy, &neutrality]
            .iter()
            .any(|d| d.fallback.is_some());
        let overall = DEPTH_WEIGHT * depth.score
            + ACCURACY_WEIGHT * accuracy.score
            + NEUTRALITY_WEIGHT * neutrality.score;

        ContentQualityScore {
            url: url.map(str::to_string),
            biographical_depth: depth,
            factual_accuracy: accuracy,
            neutrality,
            overall_score: overall.clamp(0.0, 1.0),
            fallback_used,
            content_length: excerpt.chars().count(),
        }
    }

    async fn dimension(&self, dimension: &Dimension, subject: &Subject, excerpt: &str) -> DimensionScore {
        let request = CompletionRequest::json(
            dimension.system_prompt(),
            format!("Person: {}\n\nText:\n{}", subject, excerpt),
        )
        .with_temperature(ANALYSIS_TEMPERATURE)
        .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let result = request_json::<DimensionReply>(self.llm.as_ref(), request)
            .await
            .and_then(|reply| dimension.score(reply));
        match result {
            Ok(score) => score,
            Err(e) => {
                warn!(dimension = dimension.label, kind = ?e.kind, error = %e.message, "Content analysis fell back to default");
                dimension.fallback(e.kind, &e.message)
            }
        }
    }
}
