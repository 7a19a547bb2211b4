//! Wikipedia discovery through the MediaWiki action API.
//!
//! Emits the best-matching article for the subject, up to two further
//! articles per profile search term, and the article's external links that
//! point at allow-listed quality domains. Network and decode failures are
//! logged and produce fewer candidates, never an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use super::template::{prescore, REPEATED_HOST_UNIQUENESS};
use crate::error::Result;
use crate::fetch::http::USER_AGENT;
use crate::registry::is_quality_link;
use crate::scoring::CredibilityScorer;
use crate::traits::SourceStrategy;
use crate::types::{CharacterProfile, SourceCandidate, SourceItem, SourceKind, Subject};

pub const DEFAULT_API_BASE: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";
pub const WIKIPEDIA_AUTHOR: &str = "Wikipedia contributors";

const STRATEGY_NAME: &str = "wikipedia";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_TERM_QUERIES: usize = 5;
const RESULTS_PER_TERM: usize = 2;
const MAX_EXTERNAL_LINKS: usize = 10;

const PRIMARY_RELEVANCE: f64 = 0.95;
const SECONDARY_RELEVANCE: f64 = 0.75;
const EXTERNAL_LINK_RELEVANCE: f64 = 0.8;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(default)]
    pages: Vec<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(default)]
    touched: Option<String>,
    #[serde(default)]
    extlinks: Vec<ExternalLink>,
}

#[derive(Debug, Deserialize)]
struct ExternalLink {
    url: String,
}

/// Wikipedia search strategy.
#[derive(Debug, Clone)]
pub struct WikipediaStrategy {
    client: Client,
    api_base: String,
    article_base: String,
    scorer: CredibilityScorer,
}

impl WikipediaStrategy {
    pub fn new(scorer: CredibilityScorer) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            article_base: DEFAULT_ARTICLE_BASE.to_string(),
            scorer,
        }
    }

    /// Point at another MediaWiki installation (or a mock server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_article_base(mut self, article_base: impl Into<String>) -> Self {
        self.article_base = article_base.into();
        self
    }

    fn article_url(&self, title: &str) -> String {
        format!(
            "{}{}",
            self.article_base,
            urlencoding::encode(&title.replace(' ', "_"))
        )
    }

    async fn query(&self, params: &[(&str, &str)]) -> Option<QueryBody> {
        let mut query = vec![("action", "query"), ("format", "json"), ("formatversion", "2")];
        query.extend_from_slice(params);

        let response = match self.client.get(&self.api_base).query(&query).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Wikipedia API request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(status = %response.status(), "Wikipedia API returned error status");
            return None;
        }
        match response.json::<ApiResponse>().await {
            Ok(body) => Some(body.query.unwrap_or_default()),
            Err(e) => {
                warn!(error = %e, "Wikipedia API response could not be decoded");
                None
            }
        }
    }

    async fn search_titles(&self, text: &str, limit: usize) -> Vec<String> {
        let limit = limit.to_string();
        self.query(&[("list", "search"), ("srsearch", text), ("srlimit", &limit)])
            .await
            .map(|body| body.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default()
    }

    async fn page_details(&self, title: &str) -> Option<PageInfo> {
        let body = self
            .query(&[
                ("prop", "info|extlinks"),
                ("titles", title),
                ("ellimit", "500"),
            ])
            .await?;
        body.pages.into_iter().next()
    }

    fn article(&self, title: &str, touched: Option<&str>, relevance: f64, uniqueness: f64) -> SourceCandidate {
        let mut item = SourceItem::web(format!("{} - Wikipedia", title), self.article_url(title))
            .with_author(WIKIPEDIA_AUTHOR);
        item.kind = SourceKind::Article;
        if let Some(date) = touched.and_then(|t| t.get(..10)) {
            item.publication_date = Some(date.to_string());
        }
        prescore(&self.scorer, item, STRATEGY_NAME, relevance, uniqueness)
    }
}

#[async_trait]
impl SourceStrategy for WikipediaStrategy {
    fn name(&self) -> &str {
        STRATEGY_NAME
    }

    async fn search(
        &self,
        subject: &Subject,
        profile: Option<&CharacterProfile>,
    ) -> Result<Vec<SourceCandidate>> {
        let mut candidates = Vec::new();
        let mut seen_titles = HashSet::new();

        let primary = self.search_titles(subject.as_str(), 1).await.into_iter().next();
        let details = match &primary {
            Some(title) => self.page_details(title).await,
            None => None,
        };

        if let Some(title) = &primary {
            seen_titles.insert(title.clone());
            candidates.push(self.article(
                title,
                details.as_ref().and_then(|d| d.touched.as_deref()),
                PRIMARY_RELEVANCE,
                1.0,
            ));
        }

        let terms = profile.map(|p| p.search_terms.as_slice()).unwrap_or_default();
        for term in terms.iter().take(MAX_TERM_QUERIES) {
            let titles = self.search_titles(term, RESULTS_PER_TERM + 1).await;
            let fresh: Vec<String> = titles
                .into_iter()
                .filter(|t| !seen_titles.contains(t))
                .take(RESULTS_PER_TERM)
                .collect();
            for title in fresh {
                seen_titles.insert(title.clone());
                candidates.push(self.article(&title, None, SECONDARY_RELEVANCE, REPEATED_HOST_UNIQUENESS));
            }
        }

        if let Some(details) = details {
            let links = details
                .extlinks
                .into_iter()
                .filter_map(|link| absolute_link(link.url))
                .filter(|url| is_quality_link(url))
                .take(MAX_EXTERNAL_LINKS);
            for url in links {
                let host = crate::types::host_of(&url).unwrap_or_default();
                let item = SourceItem::web(format!("{} - {}", subject, host), url);
                candidates.push(prescore(
                    &self.scorer,
                    item,
                    STRATEGY_NAME,
                    EXTERNAL_LINK_RELEVANCE,
                    1.0,
                ));
            }
        }

        debug!(subject = %subject, candidates = candidates.len(), "Wikipedia search complete");
        Ok(candidates)
    }
}

/// Protocol-relative links (`//host/path`) become `https:`; anything else
/// that is not http(s) is dropped.
fn absolute_link(url: String) -> Option<String> {
    if url.starts_with("//") {
        Some(format!("https:{}", url))
    } else if url.starts_with("http://") || url.starts_with("https://") {
        Some(url)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DomainRegistry;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_search(server: &MockServer, text: &str, titles: &[&str]) {
        let hits: Vec<_> = titles.iter().map(|t| json!({ "title": t })).collect();
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("list", "search"))
            .and(query_param("srsearch", text))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "batchcomplete": true,
                "query": { "search": hits }
            })))
            .mount(server)
            .await;
    }

    async fn mount_details(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("prop", "info|extlinks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "pages": [{
                    "pageid": 736,
                    "title": "Albert Einstein",
                    "touched": "2024-05-01T12:00:00Z",
                    "extlinks": [
                        { "url": "https://www.nobelprize.org/prizes/physics/1921/einstein/biographical/" },
                        { "url": "https://example.com/fan-page" },
                        { "url": "https://einsteinpapers.press.princeton.edu/" },
                        { "url": "//archive.org/details/relative-url" },
                        { "url": "mailto:reference@loc.gov" }
                    ]
                }]}
            })))
            .mount(server)
            .await;
    }

    fn strategy(server: &MockServer) -> WikipediaStrategy {
        WikipediaStrategy::new(CredibilityScorer::new(DomainRegistry::shared()))
            .with_api_base(format!("{}/w/api.php", server.uri()))
    }

    #[tokio::test]
    async fn test_primary_secondary_and_links() {
        let server = MockServer::start().await;
        mount_search(&server, "Albert Einstein", &["Albert Einstein"]).await;
        mount_search(
            &server,
            "Einstein relativity",
            &["Albert Einstein", "Theory of relativity", "General relativity"],
        )
        .await;
        mount_details(&server).await;

        let mut profile = CharacterProfile::fallback("Albert Einstein");
        profile.search_terms = vec!["Einstein relativity".into()];
        let subject = Subject::parse("Albert Einstein").unwrap();

        let candidates = strategy(&server).search(&subject, Some(&profile)).await.unwrap();
        let urls: Vec<_> = candidates.iter().filter_map(|c| c.url()).collect();

        assert_eq!(
            urls,
            vec![
                "https://en.wikipedia.org/wiki/Albert_Einstein",
                "https://en.wikipedia.org/wiki/Theory_of_relativity",
                "https://en.wikipedia.org/wiki/General_relativity",
                "https://www.nobelprize.org/prizes/physics/1921/einstein/biographical/",
                "https://einsteinpapers.press.princeton.edu/",
                "https://archive.org/details/relative-url",
            ]
        );
        assert_eq!(candidates[0].item.author.as_deref(), Some(WIKIPEDIA_AUTHOR));
        assert_eq!(candidates[0].item.publication_date.as_deref(), Some("2024-05-01"));
        assert!(candidates.iter().all(|c| c.meta_str("strategy") == Some("wikipedia")));
    }

    #[tokio::test]
    async fn test_unreachable_api_yields_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let subject = Subject::parse("Albert Einstein").unwrap();
        let candidates = strategy(&server).search(&subject, None).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_absolute_link() {
        assert_eq!(
            absolute_link("//archive.org/details/x".into()).as_deref(),
            Some("https://archive.org/details/x")
        );
        assert_eq!(
            absolute_link("http://www.loc.gov/item".into()).as_deref(),
            Some("http://www.loc.gov/item")
        );
        assert_eq!(absolute_link("mailto:reference@loc.gov".into()), None);
        assert_eq!(absolute_link("httpfoo".into()), None);
    }
}
