//! HTTP page fetcher.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::clean::page_metadata;
use crate::error::{FetchError, FetchResult};
use crate::traits::{FetchedPage, PageFetcher};

pub const USER_AGENT: &str =
    "BiographySourceCurator/1.0 (research source validation; +https://github.com/biography-sources)";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 5;

/// Fetches pages with a descriptive user-agent, a 10 s timeout and up to
/// five redirects. Nothing is retried.
///
/// ```rust,ignore
/// let fetcher = HttpFetcher::new();
/// let page = fetcher.fetch("https://www.loc.gov/item/mm79001744/").await?;
/// assert!(page.is_accessible());
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        debug!(url = %url, "Fetching page");
        let response = self.client.get(parsed).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Page fetch failed");
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_value(header::CONTENT_TYPE);
        let last_modified = header_value(header::LAST_MODIFIED);

        let html = response.text().await.map_err(|e| FetchError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            last_modified,
            metadata: page_metadata(&html),
            html,
        })
    }
}
