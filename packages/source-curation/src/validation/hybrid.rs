//! Hybrid mode helpers: wrapping user URLs and suggesting improvements.

use std::collections::{BTreeMap, HashSet};
use url::Url;

use crate::registry::{is_academic_url, DomainRegistry, SourceCategory};
use crate::types::{SourceCandidate, SourceItem, Subject, Suggestion, SuggestionKind};

pub const MAX_SUGGESTIONS: usize = 5;
/// More sources than this from one domain draws a diversification suggestion.
pub const MAX_SOURCES_PER_DOMAIN: usize = 5;

/// Wrap a user-supplied URL as a candidate, titled from its path.
pub fn user_candidate(url: &str) -> SourceCandidate {
    let url = url.trim();
    SourceCandidate::new(SourceItem::web(title_from_url(url), url))
        .with_meta("user_provided", true)
        .with_meta("strategy", "user")
}

/// Readable title from the last path segment, or the host.
///
/// `https://example.com/manual-source.html` becomes `Manual source`.
pub fn title_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| urlencoding::decode(s).map(|d| d.into_owned()).unwrap_or_else(|_| s.to_string()));

    let Some(segment) = segment else {
        return parsed.host_str().unwrap_or(url).to_string();
    };
    let stem = segment
        .rsplit_once('.')
        .filter(|(_, ext)| ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|(stem, _)| stem.to_string())
        .unwrap_or(segment);
    let words = stem.replace(['-', '_', '+'], " ");
    let words = words.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => parsed.host_str().unwrap_or(url).to_string(),
    }
}

/// Remove auto candidates whose URL duplicates a user URL (case-insensitive).
///
/// Returns the survivors and the number dropped.
pub fn drop_user_duplicates(
    user: &[SourceCandidate],
    auto: Vec<SourceCandidate>,
) -> (Vec<SourceCandidate>, usize) {
    let user_keys: HashSet<String> = user.iter().filter_map(SourceCandidate::dedup_key).collect();
    let before = auto.len();
    let kept: Vec<SourceCandidate> = auto
        .into_iter()
        .filter(|c| c.dedup_key().map_or(true, |k| !user_keys.contains(&k)))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Improvement suggestions for a hybrid result, most relevant first.
pub fn suggestions(
    subject: &Subject,
    sources: &[SourceCandidate],
    target_count: usize,
    auto_complete: bool,
    registry: &DomainRegistry,
) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if sources.len() < target_count && !auto_complete {
        out.push(Suggestion {
            kind: SuggestionKind::TargetUnmet,
            message: format!(
                "Only {} of {} requested sources; enable auto_complete or add more URLs",
                sources.len(),
                target_count
            ),
            relevance: 0.9,
            url: None,
        });
    }

    let urls: Vec<&str> = sources.iter().filter_map(SourceCandidate::url).collect();
    if !urls.iter().any(|u| is_academic_url(u)) {
        out.push(Suggestion {
            kind: SuggestionKind::AcademicSource,
            message: format!("No academic sources; search Google Scholar for {}", subject),
            relevance: 0.85,
            url: Some(format!("https://scholar.google.com/scholar?q={}", subject.query())),
        });
    }

    let has_government = urls.iter().any(|u| {
        registry.category(u) == SourceCategory::Government
            || crate::types::host_of(u).is_some_and(|h| h.ends_with(".gov"))
    });
    if !has_government {
        out.push(Suggestion {
            kind: SuggestionKind::GovernmentArchive,
            message: format!(
                "No government archive sources; search the Library of Congress for {}",
                subject
            ),
            relevance: 0.8,
            url: Some(format!("https://www.loc.gov/search/?q={}", subject.query())),
        });
    }

    let mut per_domain: BTreeMap<String, usize> = BTreeMap::new();
    for host in sources.iter().filter_map(SourceCandidate::host) {
        *per_domain.entry(host).or_insert(0) += 1;
    }
    for (domain, count) in per_domain.into_iter().filter(|(_, n)| *n > MAX_SOURCES_PER_DOMAIN) {
        out.push(Suggestion {
            kind: SuggestionKind::Diversify,
            message: format!(
                "{} contributes {} sources; diversify across institutions",
                domain, count
            ),
            relevance: 0.7,
            url: None,
        });
    }

    out.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    out.truncate(MAX_SUGGESTIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        Subject::parse("Albert Einstein").unwrap()
    }

    fn web(url: &str) -> SourceCandidate {
        SourceCandidate::new(SourceItem::web("Einstein", url))
    }

    #[test]
    fn test_title_from_url() {
        assert_eq!(title_from_url("https://example.com/manual-source"), "Manual source");
        assert_eq!(title_from_url("https://example.com/docs/einstein_letters.pdf"), "Einstein letters");
        assert_eq!(title_from_url("https://example.com/"), "example.com");
        assert_eq!(title_from_url("https://example.com/a/Albert%20Einstein/"), "Albert Einstein");
    }

    #[test]
    fn test_user_candidate_is_tagged() {
        let candidate = user_candidate(" https://example.com/manual-source ");
        assert_eq!(candidate.url(), Some("https://example.com/manual-source"));
        assert!(candidate.meta_bool("user_provided"));
    }

    #[test]
    fn test_drop_user_duplicates() {
        let user = vec![user_candidate("https://Archive.org/details/einstein")];
        let auto = vec![web("https://archive.org/details/einstein"), web("https://loc.gov/x")];
        let (kept, dropped) = drop_user_duplicates(&user, auto);
        assert_eq!(dropped, 1);
        assert_eq!(kept[0].url(), Some("https://loc.gov/x"));
    }

    #[test]
    fn test_suggestions_sorted_and_capped() {
        let sources: Vec<_> = (0..6)
            .map(|i| web(&format!("https://example.com/{}", i)))
            .collect();
        let out = suggestions(&subject(), &sources, 50, false, &DomainRegistry::premium());

        let kinds: Vec<_> = out.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::TargetUnmet,
                SuggestionKind::AcademicSource,
                SuggestionKind::GovernmentArchive,
                SuggestionKind::Diversify,
            ]
        );
        assert!(out.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn test_no_suggestions_for_balanced_set() {
        let sources = vec![
            web("https://www.jstor.org/stable/1"),
            web("https://www.loc.gov/item/2"),
        ];
        let out = suggestions(&subject(), &sources, 2, true, &DomainRegistry::premium());
        assert!(out.is_empty());
    }
}
