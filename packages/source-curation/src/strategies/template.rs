//! Template-driven strategies.
//!
//! A strategy is a named list of URL templates plus the shared pre-score
//! recipe. Templates are rendered with the subject (and, when the profile has
//! one, a hint such as the subject's field); no HTTP is issued here.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::scoring::{quality_score, CredibilityScorer};
use crate::traits::SourceStrategy;
use crate::types::{CharacterProfile, SourceCandidate, SourceItem, SourceKind, Subject};

/// Relevance assumed for a template candidate before its page is read.
pub const TEMPLATE_RELEVANCE: f64 = 0.9;
/// Uniqueness of a candidate whose host repeats within one strategy.
pub const REPEATED_HOST_UNIQUENESS: f64 = 0.8;

/// One structured URL template.
///
/// Placeholders: `{name}` (plain subject), `{query}` (URL-encoded subject),
/// `{terms}` (URL-encoded subject plus profile hint), `{slug}`
/// (`Albert_Einstein`).
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplate {
    pub title: &'static str,
    pub url: &'static str,
    /// Institution credited as author
    pub publisher: &'static str,
    pub kind: SourceKind,
}

impl UrlTemplate {
    pub const fn new(
        title: &'static str,
        url: &'static str,
        publisher: &'static str,
        kind: SourceKind,
    ) -> Self {
        Self {
            title,
            url,
            publisher,
            kind,
        }
    }

    pub fn render(&self, subject: &Subject, hint: Option<&str>) -> SourceItem {
        let terms = match hint {
            Some(hint) => urlencoding::encode(&format!("{} {}", subject, hint)).into_owned(),
            None => subject.query(),
        };
        let fill = |template: &str| {
            template
                .replace("{name}", subject.as_str())
                .replace("{query}", &subject.query())
                .replace("{terms}", &terms)
                .replace("{slug}", &subject.slug())
        };

        SourceItem {
            title: fill(self.title),
            url: Some(fill(self.url)),
            author: Some(self.publisher.to_string()),
            publication_date: None,
            kind: self.kind,
        }
    }
}

/// Attach credibility, estimated relevance, quality and discovery metadata.
pub(crate) fn prescore(
    scorer: &CredibilityScorer,
    item: SourceItem,
    strategy: &str,
    relevance: f64,
    uniqueness: f64,
) -> SourceCandidate {
    let credibility = scorer.assess(&item);
    let completeness = item.completeness();
    let quality = quality_score(credibility.overall, relevance, completeness, uniqueness);
    let domain = item.host().unwrap_or_default();
    let publisher = item.author.clone();

    let mut candidate = SourceCandidate::new(item)
        .with_meta("domain", domain)
        .with_meta("strategy", strategy)
        .with_meta("category", credibility.category.as_str())
        .with_meta("uniqueness", uniqueness)
        .with_meta("peer_reviewed", credibility.is_peer_reviewed());
    if let Some(premium) = credibility.premium_domain {
        candidate.set_meta("premium_domain", premium);
    }
    if let Some(publisher) = publisher {
        candidate.set_meta("publisher", publisher);
    }

    candidate.credibility_score = Some(credibility.overall);
    candidate.relevance_score = Some(relevance);
    candidate.quality_score = Some(quality);
    candidate
}

/// A strategy made of URL templates.
#[derive(Debug, Clone)]
pub struct TemplateStrategy {
    name: String,
    templates: Vec<UrlTemplate>,
    scorer: CredibilityScorer,
}

impl TemplateStrategy {
    pub fn new(name: impl Into<String>, templates: Vec<UrlTemplate>, scorer: CredibilityScorer) -> Self {
        Self {
            name: name.into(),
            templates,
            scorer,
        }
    }

    pub fn templates(&self) -> &[UrlTemplate] {
        &self.templates
    }

    /// Render every template; one candidate each, in template order.
    pub fn render(&self, subject: &Subject, profile: Option<&CharacterProfile>) -> Vec<SourceCandidate> {
        let hint = profile.and_then(CharacterProfile::hint);
        let items: Vec<SourceItem> = self
            .templates
            .iter()
            .map(|t| t.render(subject, hint))
            .collect();

        let mut host_counts: HashMap<String, usize> = HashMap::new();
        for host in items.iter().filter_map(SourceItem::host) {
            *host_counts.entry(host).or_insert(0) += 1;
        }

        items
            .into_iter()
            .map(|item| {
                let repeated = item
                    .host()
                    .and_then(|h| host_counts.get(&h))
                    .is_some_and(|count| *count > 1);
                let uniqueness = if repeated { REPEATED_HOST_UNIQUENESS } else { 1.0 };
                prescore(&self.scorer, item, &self.name, TEMPLATE_RELEVANCE, uniqueness)
            })
            .collect()
    }
}

#[async_trait]
impl SourceStrategy for TemplateStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        subject: &Subject,
        profile: Option<&CharacterProfile>,
    ) -> Result<Vec<SourceCandidate>> {
        Ok(self.render(subject, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DomainRegistry;

    fn strategy() -> TemplateStrategy {
        TemplateStrategy::new(
            "scientific",
            vec![
                UrlTemplate::new(
                    "{name} - Nobel Prize",
                    "https://www.nobelprize.org/search/?s={query}",
                    "Nobel Foundation",
                    SourceKind::Document,
                ),
                UrlTemplate::new(
                    "{name} in arXiv",
                    "https://arxiv.org/search/?query={terms}&searchtype=all",
                    "arXiv",
                    SourceKind::Article,
                ),
                UrlTemplate::new(
                    "{name} papers in arXiv",
                    "https://arxiv.org/a/{slug}",
                    "arXiv",
                    SourceKind::Article,
                ),
            ],
            CredibilityScorer::new(DomainRegistry::shared()),
        )
    }

    fn subject() -> Subject {
        Subject::parse("Marie Curie").unwrap()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let mut profile = CharacterProfile::fallback("Marie Curie");
        profile.field = Some("chemistry".into());

        let candidates = strategy().render(&subject(), Some(&profile));
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].item.title, "Marie Curie - Nobel Prize");
        assert_eq!(
            candidates[0].url(),
            Some("https://www.nobelprize.org/search/?s=Marie%20Curie")
        );
        assert_eq!(
            candidates[1].url(),
            Some("https://arxiv.org/search/?query=Marie%20Curie%20chemistry&searchtype=all")
        );
        assert_eq!(candidates[2].url(), Some("https://arxiv.org/a/Marie_Curie"));
    }

    #[test]
    fn test_every_candidate_is_prescored() {
        for candidate in strategy().render(&subject(), None) {
            assert!(candidate.quality_score.is_some_and(|q| (0.0..=100.0).contains(&q)));
            assert!(candidate.relevance_score.is_some());
            assert!(candidate.credibility_score.is_some());
            assert!(candidate.meta_str("domain").is_some());
            assert_eq!(candidate.meta_str("strategy"), Some("scientific"));
        }
    }

    #[test]
    fn test_repeated_hosts_lower_uniqueness() {
        let candidates = strategy().render(&subject(), None);
        assert_eq!(candidates[0].meta_f64("uniqueness"), Some(1.0));
        assert_eq!(candidates[1].meta_f64("uniqueness"), Some(REPEATED_HOST_UNIQUENESS));
        assert!(candidates[0].quality_score > candidates[1].quality_score);
    }

    #[test]
    fn test_nobel_template_meets_target() {
        let candidates = strategy().render(&subject(), None);
        // 0.5*95 + 0.3*75 + 0.2*70 = 84 credibility
        assert_eq!(candidates[0].credibility_score, Some(84.0));
        assert!(candidates[0].quality_score.unwrap() >= 85.0);
    }

    #[test]
    fn test_journal_candidates_feed_peer_reviewed_pattern() {
        let journals = TemplateStrategy::new(
            "academic",
            vec![
                UrlTemplate::new(
                    "{name} in JSTOR",
                    "https://www.jstor.org/action/doBasicSearch?Query={query}",
                    "JSTOR",
                    SourceKind::Article,
                ),
                UrlTemplate::new(
                    "{name} in Springer",
                    "https://link.springer.com/search?query={query}",
                    "Springer",
                    SourceKind::Article,
                ),
            ],
            CredibilityScorer::new(DomainRegistry::shared()),
        );
        let candidates = journals.render(&subject(), None);
        assert!(candidates.iter().all(|c| c.meta_bool("peer_reviewed")));
        assert!(!strategy().render(&subject(), None)[0].meta_bool("peer_reviewed"));

        let patterns = crate::feedback::identify_patterns(&candidates, 90.0);
        assert!(patterns
            .iter()
            .any(|p| p.kind == crate::types::PatternKind::Metadata && p.value == "peer_reviewed"));
    }
}
