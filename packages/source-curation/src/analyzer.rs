//! Character analysis: one LLM call turning a bare name into a profile.

use llm_client::StructuredOutput;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::{request_json, Outcome};
use crate::traits::{CompletionRequest, Llm};
use crate::types::{CharacterProfile, ProfileReply, Subject};

const ANALYSIS_TEMPERATURE: f32 = 0.3;
const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// Builds a [`CharacterProfile`] for a subject.
///
/// Never fails: transport, parse or schema problems yield
/// [`CharacterProfile::fallback`], with the cause recorded in the outcome.
#[derive(Clone)]
pub struct CharacterAnalyzer {
    llm: Arc<dyn Llm>,
}

impl CharacterAnalyzer {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    pub async fn analyze(&self, subject: &Subject) -> Outcome<CharacterProfile> {
        let name = subject.as_str();
        let request = CompletionRequest::json(system_prompt(), format!("Historical figure: {}", name))
            .with_temperature(ANALYSIS_TEMPERATURE)
            .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let result = request_json::<ProfileReply>(self.llm.as_ref(), request)
            .await
            .map(|reply| CharacterProfile::from_reply(name, reply));
        let outcome = Outcome::from_result(result, || CharacterProfile::fallback(name));

        match outcome.failure() {
            Some((kind, message)) => {
                warn!(subject = %name, ?kind, error = %message, "Character analysis fell back to minimal profile")
            }
            None => info!(
                subject = %name,
                field = outcome.value().field.as_deref().unwrap_or("unknown"),
                search_terms = outcome.value().search_terms.len(),
                "Character analyzed"
            ),
        }

        outcome
    }
}

fn system_prompt() -> String {
    format!(
        "You are a research librarian preparing a biography. Describe the historical figure \
         named by the user.\n\
         Reply ONLY with a JSON object, no prose, matching this schema:\n{}\n\
         Rules:\n\
         - Use null for anything you do not know.\n\
         - key_events and related_entities: at most 5 short items each.\n\
         - search_terms: 5 to 8 short English search queries about the person.",
        ProfileReply::schema_prompt()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FailureKind;
    use crate::testing::MockLlm;

    const REPLY: &str = r#"```json
    {
        "period": "1879-1955",
        "nationality": "German",
        "field": "physics",
        "specialty": "theoretical physics",
        "key_events": ["Annus mirabilis papers", "Nobel Prize in Physics 1921"],
        "related_entities": ["Mileva Marić", "Institute for Advanced Study"],
        "search_terms": ["Einstein relativity", "Einstein Nobel Prize", "Einstein Princeton",
                          "Einstein letters", "Einstein photoelectric effect"]
    }
    ```"#;

    fn subject() -> Subject {
        Subject::parse("Albert Einstein").unwrap()
    }

    #[tokio::test]
    async fn test_analyze_parses_reply() {
        let llm = Arc::new(MockLlm::new().with_reply("Historical figure", REPLY));
        let outcome = CharacterAnalyzer::new(llm.clone()).analyze(&subject()).await;

        assert!(!outcome.fallback_used());
        let profile = outcome.into_value();
        assert_eq!(profile.field.as_deref(), Some("physics"));
        assert_eq!(profile.search_terms[0], "Albert Einstein biography");
        assert_eq!(profile.search_terms.len(), 6);

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, ANALYSIS_TEMPERATURE);
        assert!(calls[0].system.contains("search_terms"));
    }

    #[tokio::test]
    async fn test_unreachable_llm_falls_back() {
        let llm = Arc::new(MockLlm::new().failing());
        let outcome = CharacterAnalyzer::new(llm).analyze(&subject()).await;

        assert_eq!(outcome.failure().map(|f| f.0), Some(FailureKind::Transport));
        let profile = outcome.into_value();
        assert_eq!(profile.name, "Albert Einstein");
        assert_eq!(profile.search_terms.len(), 3);
    }

    #[tokio::test]
    async fn test_prose_reply_falls_back() {
        let llm = Arc::new(MockLlm::new().with_default_reply("Einstein was a physicist."));
        let outcome = CharacterAnalyzer::new(llm).analyze(&subject()).await;

        assert_eq!(outcome.failure().map(|f| f.0), Some(FailureKind::Parse));
        assert!(!outcome.value().search_terms.is_empty());
    }
}
