//! Candidate validation: structure, accessibility, credibility, relevance,
//! filtering and optional deep analysis.

pub mod deep;
pub mod hybrid;
pub mod report;
pub mod structural;

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::fetch::PageMetadata;
use crate::scoring::{quality_score, score_relevance, CredibilityScorer};
use crate::scoring::relevance::MAX_CONTENT_CHARS;
use crate::traits::PageFetcher;
use crate::types::{
    AdvancedValidationResponse, SourceCandidate, SourceValidation, Subject, ValidationOptions,
};

pub use deep::{ContentAnalyzer, DEFAULT_MAX_CONTENT_LENGTH};
pub use report::{aggregate, recommendations};
pub use structural::{is_well_formed_url, structural_issues, EMPTY_TITLE_ISSUE};

/// Upper bound on concurrent candidate validations.
pub const MAX_CONCURRENT_VALIDATIONS: usize = 8;
/// Relevance used for rescoring when nothing was measured or estimated.
pub const UNMEASURED_RELEVANCE: f64 = 0.5;

/// Validates candidates against a [`ValidationOptions`].
#[derive(Clone)]
pub struct Validator {
    scorer: CredibilityScorer,
    fetcher: Arc<dyn PageFetcher>,
    content: Option<ContentAnalyzer>,
}

impl Validator {
    pub fn new(scorer: CredibilityScorer, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            scorer,
            fetcher,
            content: None,
        }
    }

    /// Enable `deep_analysis` requests.
    pub fn with_content_analyzer(mut self, analyzer: ContentAnalyzer) -> Self {
        self.content = Some(analyzer);
        self
    }

    pub fn scorer(&self) -> &CredibilityScorer {
        &self.scorer
    }

    /// Validate a batch; results keep input order.
    pub async fn validate(
        &self,
        subject: &Subject,
        candidates: Vec<SourceCandidate>,
        options: &ValidationOptions,
    ) -> AdvancedValidationResponse {
        let pool = candidates.len().clamp(1, MAX_CONCURRENT_VALIDATIONS);
        let results: Vec<SourceValidation> = stream::iter(
            candidates
                .into_iter()
                .map(|candidate| self.validate_one(subject, candidate, options)),
        )
        .buffered(pool)
        .collect()
        .await;

        let summary = aggregate(&results);
        let recommendations = recommendations(&results, &summary, options);
        info!(
            subject = %subject,
            total = summary.total_sources,
            accepted = summary.accepted_sources,
            invalid = summary.invalid_sources,
            "Validation complete"
        );

        AdvancedValidationResponse {
            subject: subject.to_string(),
            results,
            summary,
            recommendations,
        }
    }

    /// Validate one candidate and write measured scores back into it.
    pub async fn validate_one(
        &self,
        subject: &Subject,
        mut candidate: SourceCandidate,
        options: &ValidationOptions,
    ) -> SourceValidation {
        let issues = structural_issues(&candidate.item);
        let valid = issues.is_empty();
        let mut warnings = Vec::new();

        let mut accessible = None;
        let mut relevance = None;
        let mut content_quality = None;

        let url = candidate.item.url.clone();
        if let (true, true, Some(url)) = (valid, options.check_accessibility, url) {
            match self.fetcher.fetch(&url).await {
                Ok(page) => {
                    accessible = Some(page.is_accessible());
                    candidate.set_meta("http_status", page.status);
                    if let Some(content_type) = &page.content_type {
                        candidate.set_meta("content_type", content_type.as_str());
                    }
                    if let Some(last_modified) = &page.last_modified {
                        candidate.set_meta("last_modified", last_modified.as_str());
                    }

                    if page.is_accessible() {
                        fill_from_page(&mut candidate, &page.metadata);
                        let text = page.text();
                        if !text.is_empty() {
                            let measured =
                                score_relevance(subject.as_str(), &candidate.item.title, &text);
                            relevance = Some(measured.score);
                            if measured.generic_page {
                                warnings.push("Page looks like a search or index page".to_string());
                            }
                            let excerpt: String = text.chars().take(MAX_CONTENT_CHARS).collect();
                            candidate.set_meta("content_length", text.chars().count());
                            candidate.set_meta("content", excerpt);
                        }
                        if let (true, Some(analyzer)) = (options.deep_analysis, &self.content) {
                            content_quality = Some(
                                analyzer
                                    .analyze(subject, Some(&url), &text, DEFAULT_MAX_CONTENT_LENGTH)
                                    .await,
                            );
                        }
                    } else {
                        warnings.push(format!("URL returned HTTP {}", page.status));
                    }
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Candidate unreachable");
                    accessible = Some(false);
                    warnings.push(format!("URL is unreachable: {}", e));
                }
            }
        }

        // Scored after the fetch so page metadata counts toward completeness.
        let credibility = self.scorer.assess(&candidate.item);
        warnings.splice(0..0, credibility.warnings.iter().cloned());

        let accepted = valid
            && accessible != Some(false)
            && relevance.map_or(true, |r| r >= options.min_relevance)
            && credibility.overall >= options.min_credibility;

        let rescoring_relevance = relevance
            .or(candidate.relevance_score)
            .unwrap_or(UNMEASURED_RELEVANCE);
        let uniqueness = candidate.meta_f64("uniqueness").unwrap_or(1.0);
        candidate.credibility_score = Some(credibility.overall);
        candidate.relevance_score = Some(rescoring_relevance);
        candidate.quality_score = Some(quality_score(
            credibility.overall,
            rescoring_relevance,
            candidate.item.completeness(),
            uniqueness,
        ));
        candidate.set_meta("credibility_category", credibility.category.as_str());
        candidate.set_meta("peer_reviewed", credibility.is_peer_reviewed());
        if let Some(accessible) = accessible {
            candidate.set_meta("accessible", accessible);
        }

        debug!(
            url = candidate.url().unwrap_or("-"),
            valid,
            accepted,
            credibility = credibility.overall,
            relevance = ?relevance,
            "Candidate validated"
        );

        SourceValidation {
            source: candidate,
            valid,
            accessible,
            accepted,
            issues,
            warnings,
            credibility,
            relevance,
            content_quality,
        }
    }
}

/// Fill a missing author or publication date from the page markup.
fn fill_from_page(candidate: &mut SourceCandidate, metadata: &PageMetadata) {
    let item = &mut candidate.item;
    if !has_text(&item.author) {
        if let Some(author) = &metadata.author {
            item.author = Some(author.clone());
        }
    }
    if !has_text(&item.publication_date) {
        if let Some(published) = &metadata.published {
            item.publication_date = Some(published.clone());
        }
    }
    if let Some(title) = &metadata.title {
        candidate.set_meta("page_title", title.as_str());
    }
}

fn has_text(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DomainRegistry;
    use crate::testing::{MockFetcher, MockLlm};
    use crate::types::{SourceItem, SourceKind};

    const EINSTEIN_PAGE: &str = "<html><head><title>Albert Einstein</title></head><body>\
        <nav>Home About</nav><p>Albert Einstein biography. Albert Einstein was a theoretical \
        physicist born in Ulm. Historical records of Albert Einstein describe relativity.</p>\
        <footer>Copyright</footer></body></html>";

    fn subject() -> Subject {
        Subject::parse("Albert Einstein").unwrap()
    }

    fn validator(fetcher: MockFetcher) -> Validator {
        Validator::new(
            CredibilityScorer::new(DomainRegistry::shared()).with_current_year(2024),
            Arc::new(fetcher),
        )
    }

    fn nobel() -> SourceCandidate {
        SourceCandidate::new(
            SourceItem::web(
                "Albert Einstein - Biographical",
                "https://www.nobelprize.org/prizes/physics/1921/einstein/biographical/",
            )
            .with_author("Nobel Foundation"),
        )
    }

    #[tokio::test]
    async fn test_accessible_relevant_premium_source_accepted() {
        let v = validator(MockFetcher::new().with_default_page(EINSTEIN_PAGE));
        let result = v.validate_one(&subject(), nobel(), &ValidationOptions::default()).await;

        assert!(result.valid);
        assert_eq!(result.accessible, Some(true));
        assert!(result.relevance.unwrap() >= 0.7);
        assert!(result.accepted);
        assert_eq!(result.source.credibility_score, Some(result.credibility.overall));
        assert!(result.source.content().unwrap().contains("physicist"));
        assert!(!result.source.content().unwrap().contains("Copyright"));
    }

    #[tokio::test]
    async fn test_unreachable_source_rejected() {
        let v = validator(MockFetcher::new().with_unreachable(
            "https://www.nobelprize.org/prizes/physics/1921/einstein/biographical/",
        ));
        let result = v.validate_one(&subject(), nobel(), &ValidationOptions::default()).await;

        assert!(result.valid);
        assert_eq!(result.accessible, Some(false));
        assert!(!result.accepted);
        assert!(result.warnings.iter().any(|w| w.contains("unreachable")));
    }

    #[tokio::test]
    async fn test_error_status_rejected() {
        let v = validator(MockFetcher::new());
        let result = v.validate_one(&subject(), nobel(), &ValidationOptions::default()).await;
        assert_eq!(result.accessible, Some(false));
        assert!(result.warnings.iter().any(|w| w.contains("404")));
    }

    #[tokio::test]
    async fn test_without_accessibility_nothing_fetched() {
        let fetcher = Arc::new(MockFetcher::new());
        let v = Validator::new(CredibilityScorer::new(DomainRegistry::shared()), fetcher.clone());
        let options = ValidationOptions {
            check_accessibility: false,
            ..Default::default()
        };
        let result = v.validate_one(&subject(), nobel(), &options).await;

        assert!(fetcher.calls().is_empty());
        assert_eq!(result.accessible, None);
        assert_eq!(result.relevance, None);
        assert!(result.accepted);
    }

    #[tokio::test]
    async fn test_untitled_item() {
        let v = validator(MockFetcher::new());
        let candidate = SourceCandidate::new(SourceItem::new("", SourceKind::Other));
        let response = v
            .validate(&subject(), vec![candidate], &ValidationOptions::default())
            .await;

        assert_eq!(response.summary.valid_sources, 0);
        assert_eq!(response.results[0].issues, vec![EMPTY_TITLE_ISSUE.to_string()]);
        assert!(response
            .recommendations
            .iter()
            .any(|r| r.contains("title") || r.contains("credibility")));
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let v = validator(MockFetcher::new().with_default_page(EINSTEIN_PAGE));
        let candidates: Vec<_> = (0..20)
            .map(|i| {
                SourceCandidate::new(SourceItem::web(
                    format!("Einstein {}", i),
                    format!("https://archive.org/details/einstein-{}", i),
                ))
            })
            .collect();
        let response = v
            .validate(&subject(), candidates, &ValidationOptions::default())
            .await;

        for (i, result) in response.results.iter().enumerate() {
            assert_eq!(
                result.source.url(),
                Some(format!("https://archive.org/details/einstein-{}", i).as_str())
            );
        }
    }

    #[tokio::test]
    async fn test_deep_analysis_on_request() {
        let llm = Arc::new(MockLlm::new().with_default_reply("not json"));
        let v = validator(MockFetcher::new().with_default_page(EINSTEIN_PAGE))
            .with_content_analyzer(ContentAnalyzer::new(llm.clone()));
        let options = ValidationOptions {
            deep_analysis: true,
            ..Default::default()
        };
        let result = v.validate_one(&subject(), nobel(), &options).await;

        let quality = result.content_quality.unwrap();
        assert!(quality.fallback_used);
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_page_metadata_fills_missing_fields() {
        let page = "<html><head><title>Einstein Papers</title>\
            <meta name=\"author\" content=\"Walter Isaacson\">\
            <meta property=\"article:published_time\" content=\"2007-04-10\"></head>\
            <body><p>Albert Einstein biography. Albert Einstein historical records.</p></body></html>";
        let bare = || {
            SourceCandidate::new(SourceItem::web(
                "Albert Einstein papers",
                "https://archive.org/details/einstein-papers",
            ))
        };

        let offline = ValidationOptions {
            check_accessibility: false,
            ..Default::default()
        };
        let unfetched = validator(MockFetcher::new()).validate_one(&subject(), bare(), &offline).await;
        let fetched = validator(MockFetcher::new().with_default_page(page))
            .validate_one(&subject(), bare(), &ValidationOptions::default())
            .await;

        assert_eq!(fetched.source.item.author.as_deref(), Some("Walter Isaacson"));
        assert_eq!(fetched.source.item.publication_date.as_deref(), Some("2007-04-10"));
        assert_eq!(fetched.source.meta_str("page_title"), Some("Einstein Papers"));
        assert!(fetched.credibility.completeness_score > unfetched.credibility.completeness_score);
    }

    #[tokio::test]
    async fn test_existing_author_is_kept() {
        let page = "<html><head><meta name=\"author\" content=\"Someone Else\"></head>\
            <body><p>Albert Einstein biography.</p></body></html>";
        let result = validator(MockFetcher::new().with_default_page(page))
            .validate_one(&subject(), nobel(), &ValidationOptions::default())
            .await;
        assert_eq!(result.source.item.author.as_deref(), Some("Nobel Foundation"));
    }

    #[tokio::test]
    async fn test_journal_candidate_flagged_peer_reviewed() {
        let jstor = SourceCandidate::new(SourceItem::web(
            "Einstein and relativity",
            "https://www.jstor.org/stable/2785718",
        ));
        let options = ValidationOptions {
            check_accessibility: false,
            ..Default::default()
        };
        let v = validator(MockFetcher::new());

        let result = v.validate_one(&subject(), jstor, &options).await;
        assert!(result.source.meta_bool("peer_reviewed"));
        let result = v.validate_one(&subject(), nobel(), &options).await;
        assert!(!result.source.meta_bool("peer_reviewed"));
    }
}
