//! Source items and scored candidates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Free-form metadata attached to a candidate.
pub type Metadata = Map<String, Value>;

/// Kind of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Url,
    Book,
    Article,
    Document,
    #[default]
    Other,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Url => "url",
            SourceKind::Book => "book",
            SourceKind::Article => "article",
            SourceKind::Document => "document",
            SourceKind::Other => "other",
        }
    }
}

/// A bibliographic reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceItem {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(default, rename = "source_type")]
    pub kind: SourceKind,
}

impl SourceItem {
    pub fn new(title: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            title: title.into(),
            kind,
            ..Default::default()
        }
    }

    /// A web page reference.
    pub fn web(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
            kind: SourceKind::Url,
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.publication_date = Some(date.into());
        self
    }

    /// Lowercased host without a leading `www.`.
    pub fn host(&self) -> Option<String> {
        self.url.as_deref().and_then(host_of)
    }

    /// Present fields out of {title, author, date, url}, as a fraction.
    pub fn completeness(&self) -> f64 {
        let present = [
            !self.title.trim().is_empty(),
            has_text(&self.author),
            has_text(&self.publication_date),
            has_text(&self.url),
        ];
        present.iter().filter(|p| **p).count() as f64 / present.len() as f64
    }
}

/// A source enriched by discovery and validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceCandidate {
    #[serde(flatten)]
    pub item: SourceItem,
    /// Composite quality on [0, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Topical relevance on [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    /// Credibility on [0, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<f64>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl SourceCandidate {
    pub fn new(item: SourceItem) -> Self {
        Self {
            item,
            ..Default::default()
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.item.url.as_deref()
    }

    pub fn host(&self) -> Option<String> {
        self.item.host()
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn meta_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(Value::as_f64)
    }

    pub fn meta_bool(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set_meta(key, value);
        self
    }

    /// Page text captured in `metadata.content`, if any.
    pub fn content(&self) -> Option<&str> {
        self.meta_str("content").filter(|c| !c.trim().is_empty())
    }

    /// Case-insensitive URL key for deduplication.
    pub fn dedup_key(&self) -> Option<String> {
        self.url().map(|u| u.trim().to_lowercase())
    }
}

impl From<SourceItem> for SourceCandidate {
    fn from(item: SourceItem) -> Self {
        Self::new(item)
    }
}

/// Lowercased host of `url` without a leading `www.`.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
