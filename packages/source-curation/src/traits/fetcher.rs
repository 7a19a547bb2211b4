//! Page fetching for accessibility, relevance and deep analysis.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::fetch::clean::{clean_text, PageMetadata};

/// A fetched page; returned for any HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
    /// Title, author and publication date found in the markup
    pub metadata: PageMetadata,
    pub html: String,
}

impl FetchedPage {
    pub fn is_accessible(&self) -> bool {
        self.status < 400
    }

    /// Visible body text with boilerplate removed.
    pub fn text(&self) -> String {
        clean_text(&self.html)
    }
}

/// Fetches a URL.
///
/// Transport failures (DNS, TLS, timeout) are errors; HTTP error statuses
/// are not.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;
}
