//! Premium domain registry.
//!
//! The single place that knows which hosts are authoritative. Strategies,
//! scorers and the cross-validator all ask the registry instead of matching
//! URLs themselves.
//!
//! Lookup is exact, then by parent-domain suffix, so `plato.stanford.edu`
//! resolves to the `stanford.edu` entry. Unknown hosts resolve to `None` and
//! an authority of [`DEFAULT_AUTHORITY`].

mod premium;

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::host_of;

/// Authority assumed for hosts outside the registry.
pub const DEFAULT_AUTHORITY: u8 = 50;

lazy_static! {
    static ref SHARED: Arc<DomainRegistry> = Arc::new(DomainRegistry::premium());
}

/// Registry bucket an entry is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Tier1Academic,
    GovernmentArchives,
    Tier1Encyclopedic,
    Tier1Biographical,
    Tier1News,
}

impl Bucket {
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Tier1Academic => "tier1_academic",
            Bucket::GovernmentArchives => "government_archives",
            Bucket::Tier1Encyclopedic => "tier1_encyclopedic",
            Bucket::Tier1Biographical => "tier1_biographical",
            Bucket::Tier1News => "tier1_news",
        }
    }

    pub fn category(&self) -> SourceCategory {
        match self {
            Bucket::Tier1Academic => SourceCategory::Academic,
            Bucket::GovernmentArchives => SourceCategory::Government,
            Bucket::Tier1Encyclopedic => SourceCategory::Encyclopedic,
            Bucket::Tier1Biographical => SourceCategory::Biographical,
            Bucket::Tier1News => SourceCategory::News,
        }
    }
}

/// Reporting category of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    Academic,
    Government,
    Encyclopedic,
    Biographical,
    News,
    Other,
}

impl SourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Academic => "academic",
            SourceCategory::Government => "government",
            SourceCategory::Encyclopedic => "encyclopedic",
            SourceCategory::Biographical => "biographical",
            SourceCategory::News => "news",
            SourceCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorialProcess {
    PeerReviewed,
    GovernmentCurated,
    ExpertReviewed,
    EditorialReview,
    JournalisticStandards,
    InternationalOrganization,
    Curated,
    OfficialRecords,
}

/// An immutable registry record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEntry {
    pub domain: &'static str,
    /// Published authority on [0, 100]
    pub authority: u8,
    pub specialty: &'static [&'static str],
    pub editorial_process: EditorialProcess,
    pub bucket: Bucket,
}

impl DomainEntry {
    pub fn category(&self) -> SourceCategory {
        self.bucket.category()
    }
}

/// Read-only host → entry map.
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    entries: HashMap<&'static str, DomainEntry>,
}

impl DomainRegistry {
    /// The shipped premium registry.
    pub fn premium() -> Self {
        Self::from_entries(premium::entries())
    }

    /// Process-wide instance of [`DomainRegistry::premium`].
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = DomainEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.domain, e)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &DomainEntry> {
        self.entries.values()
    }

    /// Resolve a host or URL, exact match first, then parent domains.
    pub fn lookup(&self, host_or_url: &str) -> Option<&DomainEntry> {
        let host = normalize_host(host_or_url)?;
        let mut candidate = host.as_str();
        loop {
            if let Some(entry) = self.entries.get(candidate) {
                return Some(entry);
            }
            candidate = candidate.split_once('.')?.1;
        }
    }

    /// Published authority, or [`DEFAULT_AUTHORITY`] when unknown.
    pub fn authority(&self, host_or_url: &str) -> u8 {
        self.lookup(host_or_url)
            .map(|e| e.authority)
            .unwrap_or(DEFAULT_AUTHORITY)
    }

    pub fn category(&self, host_or_url: &str) -> SourceCategory {
        self.lookup(host_or_url)
            .map(DomainEntry::category)
            .unwrap_or(SourceCategory::Other)
    }
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::premium()
    }
}

const ACADEMIC_SIGNATURES: &[&str] = &[
    ".ac.", "jstor", "scholar", "springer", "ieee", "arxiv", "nature.com",
    "science.org", "wiley", "tandfonline", "cambridge.org", "oup.com", "muse.jhu",
    "pnas.org", "royalsocietypublishing", "sciencedirect", "ncbi.nlm.nih.gov",
];

const QUALITY_LINK_DOMAINS: &[&str] = &[
    "archive.org", "britannica.com", "nobelprize.org", "loc.gov", "jstor.org",
    "gutenberg.org", "history.com", "biography.com",
];

/// Whether a URL carries an academic-domain signature.
pub fn is_academic_url(url: &str) -> bool {
    let Some(host) = normalize_host(url) else {
        return false;
    };
    host.ends_with(".edu") || ACADEMIC_SIGNATURES.iter().any(|sig| host.contains(sig))
}

/// Whether an external link points at an allow-listed quality domain.
pub fn is_quality_link(url: &str) -> bool {
    let Some(host) = normalize_host(url) else {
        return false;
    };
    host.ends_with(".edu")
        || host.ends_with(".gov")
        || QUALITY_LINK_DOMAINS
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}

fn normalize_host(host_or_url: &str) -> Option<String> {
    let trimmed = host_or_url.trim();
    if trimmed.contains("://") {
        return host_of(trimmed);
    }
    let host = trimmed
        .split(['/', ':'])
        .next()?
        .trim_end_matches('.')
        .to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_suffix_agree() {
        let registry = DomainRegistry::premium();
        let exact = registry.lookup("stanford.edu").unwrap();
        let suffix = registry.lookup("plato.stanford.edu").unwrap();
        assert_eq!(exact, suffix);
        assert_eq!(exact.bucket, Bucket::Tier1Academic);
    }

    #[test]
    fn test_lookup_accepts_urls() {
        let registry = DomainRegistry::premium();
        let entry = registry
            .lookup("https://www.nobelprize.org/prizes/physics/1921/einstein/biographical/")
            .unwrap();
        assert_eq!(entry.domain, "nobelprize.org");
        assert_eq!(registry.category("https://www.loc.gov/item/x"), SourceCategory::Government);
    }

    #[test]
    fn test_unknown_host_defaults() {
        let registry = DomainRegistry::premium();
        assert!(registry.lookup("example.com").is_none());
        assert!(registry.lookup("blog.example.com").is_none());
        assert_eq!(registry.authority("example.com"), DEFAULT_AUTHORITY);
        assert_eq!(registry.category("example.com"), SourceCategory::Other);
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_more_specific_entry_wins() {
        let registry = DomainRegistry::premium();
        assert_eq!(registry.lookup("history.nasa.gov").unwrap().domain, "history.nasa.gov");
        assert_eq!(registry.lookup("images.nasa.gov").unwrap().domain, "nasa.gov");
    }

    #[test]
    fn test_every_bucket_populated() {
        let registry = DomainRegistry::premium();
        for bucket in [
            Bucket::Tier1Academic,
            Bucket::GovernmentArchives,
            Bucket::Tier1Encyclopedic,
            Bucket::Tier1Biographical,
            Bucket::Tier1News,
        ] {
            assert!(registry.entries().any(|e| e.bucket == bucket), "{}", bucket.key());
        }
        assert!(registry.entries().all(|e| e.authority <= 100));
    }

    #[test]
    fn test_academic_signatures() {
        assert!(is_academic_url("https://plato.stanford.edu/entries/einstein/"));
        assert!(is_academic_url("https://www.jstor.org/stable/123"));
        assert!(is_academic_url("https://www.ox.ac.uk/news"));
        assert!(!is_academic_url("https://www.nytimes.com/1955/04/19/archives/einstein.html"));
    }

    #[test]
    fn test_quality_links() {
        assert!(is_quality_link("https://archive.org/details/einstein"));
        assert!(is_quality_link("https://history.aip.org.example.edu/x"));
        assert!(is_quality_link("https://www.loc.gov/item/x"));
        assert!(!is_quality_link("https://www.imdb.com/name/nm0251959/"));
    }
}
