//! Set-level measures that need no LLM: temporal coverage, diversity,
//! redundancy and academic compliance.

use std::collections::{BTreeMap, HashSet};

use crate::registry::is_academic_url;
use crate::types::{AcademicAssessment, DiversityBreakdown, SourceCandidate, TemporalAnalysis};

pub const EARLY_LIFE: &[&str] = &["birth", "childhood", "early", "youth", "education", "born"];
pub const CAREER: &[&str] = &[
    "career",
    "work",
    "achievement",
    "accomplishment",
    "profession",
    "discovery",
    "published",
];
pub const LATER_YEARS: &[&str] = &["later", "retirement", "old age", "final years", "death", "died"];
pub const LEGACY: &[&str] = &["legacy", "influence", "impact", "remembered", "honored", "memorial"];

/// Credibility at or above which a source counts as primary.
pub const PRIMARY_SOURCE_CREDIBILITY: f64 = 90.0;
const MIN_ACADEMIC_SHARE: f64 = 0.3;
const MIN_MEAN_CREDIBILITY: f64 = 75.0;

/// Which life periods the sources' text mentions.
pub fn temporal_analysis<'a>(contents: impl IntoIterator<Item = &'a str>) -> TemporalAnalysis {
    let mut analysis = TemporalAnalysis::default();
    for content in contents {
        let text = content.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));
        analysis.early_life |= mentions(EARLY_LIFE);
        analysis.career |= mentions(CAREER);
        analysis.later_years |= mentions(LATER_YEARS);
        analysis.legacy |= mentions(LEGACY);
    }
    analysis
}

/// Life periods not covered, for recommendations.
pub fn missing_periods(analysis: &TemporalAnalysis) -> Vec<&'static str> {
    [
        (analysis.early_life, "early life"),
        (analysis.career, "career"),
        (analysis.later_years, "later years"),
        (analysis.legacy, "legacy"),
    ]
    .into_iter()
    .filter(|(covered, _)| !covered)
    .map(|(_, name)| name)
    .collect()
}

/// Type, domain and author variety, and their weighted score.
pub fn diversity(sources: &[SourceCandidate]) -> (f64, DiversityBreakdown) {
    let n = sources.len();
    if n == 0 {
        return (0.0, DiversityBreakdown::default());
    }

    let kinds: HashSet<_> = sources.iter().map(|s| s.item.kind).collect();
    let domains: HashSet<String> = sources.iter().filter_map(SourceCandidate::host).collect();
    let authors: HashSet<String> = sources
        .iter()
        .filter_map(|s| s.item.author.as_deref())
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();

    let breakdown = DiversityBreakdown {
        source_type: (kinds.len() as f64 / n.min(5) as f64).min(1.0),
        domain: domains.len() as f64 / n as f64,
        author: authors.len() as f64 / n as f64,
    };
    let score = 0.3 * breakdown.source_type + 0.5 * breakdown.domain + 0.2 * breakdown.author;
    (score.clamp(0.0, 1.0), breakdown)
}

/// Fraction of sources whose host is shared with another source, and the
/// shared hosts.
pub fn redundancy(sources: &[SourceCandidate]) -> (f64, Vec<String>) {
    if sources.is_empty() {
        return (0.0, Vec::new());
    }
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for host in sources.iter().filter_map(SourceCandidate::host) {
        *counts.entry(host).or_insert(0) += 1;
    }
    let shared: Vec<String> = counts
        .iter()
        .filter(|(_, n)| **n > 1)
        .map(|(host, _)| host.clone())
        .collect();
    let redundant: usize = counts.values().filter(|n| **n > 1).sum();
    (redundant as f64 / sources.len() as f64, shared)
}

/// Academic share blended 0.6/0.4 with mean credibility.
///
/// `credibility` gives each source's score on [0, 100].
pub fn academic_compliance(
    sources: &[SourceCandidate],
    credibility: impl Fn(&SourceCandidate) -> f64,
) -> (f64, AcademicAssessment) {
    let n = sources.len();
    if n == 0 {
        return (0.0, AcademicAssessment::default());
    }

    let academic = sources
        .iter()
        .filter(|s| s.url().is_some_and(is_academic_url))
        .count();
    let scores: Vec<f64> = sources.iter().map(&credibility).collect();
    let mean_credibility = scores.iter().sum::<f64>() / n as f64;
    let primary = scores.iter().filter(|c| **c >= PRIMARY_SOURCE_CREDIBILITY).count();
    let academic_share = academic as f64 / n as f64;

    let mut issues = Vec::new();
    if academic_share < MIN_ACADEMIC_SHARE {
        issues.push(format!(
            "Only {:.0}% of sources are academic; at least {:.0}% is expected",
            academic_share * 100.0,
            MIN_ACADEMIC_SHARE * 100.0
        ));
    }
    if mean_credibility < MIN_MEAN_CREDIBILITY {
        issues.push(format!(
            "Mean credibility {:.0} is below {:.0}",
            mean_credibility, MIN_MEAN_CREDIBILITY
        ));
    }

    let compliance = 0.6 * academic_share + 0.4 * (mean_credibility / 100.0).clamp(0.0, 1.0);
    (
        compliance.clamp(0.0, 1.0),
        AcademicAssessment {
            academic_share,
            mean_credibility,
            peer_reviewed_count: academic,
            primary_source_count: primary,
            issues,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceItem, SourceKind};

    fn source(url: &str, kind: SourceKind, author: Option<&str>) -> SourceCandidate {
        let mut item = SourceItem::web("Einstein", url);
        item.kind = kind;
        item.author = author.map(String::from);
        SourceCandidate::new(item)
    }

    #[test]
    fn test_temporal_keywords() {
        let analysis = temporal_analysis(["He was born in Ulm.", "His legacy endures."]);
        assert!(analysis.early_life);
        assert!(!analysis.career);
        assert!(!analysis.later_years);
        assert!(analysis.legacy);
        assert_eq!(missing_periods(&analysis), vec!["career", "later years"]);

        let full = temporal_analysis(["born", "career", "died", "memorial"]);
        assert_eq!(full.score(), 1.0);
    }

    #[test]
    fn test_diversity_components() {
        let sources = vec![
            source("https://www.jstor.org/a", SourceKind::Article, Some("A")),
            source("https://www.jstor.org/b", SourceKind::Article, Some("A")),
            source("https://www.loc.gov/c", SourceKind::Document, None),
            source("https://archive.org/d", SourceKind::Book, Some("B")),
        ];
        let (score, breakdown) = diversity(&sources);

        assert_eq!(breakdown.source_type, 3.0 / 4.0);
        assert_eq!(breakdown.domain, 3.0 / 4.0);
        assert_eq!(breakdown.author, 2.0 / 4.0);
        assert!((score - (0.3 * 0.75 + 0.5 * 0.75 + 0.2 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_redundancy_by_host() {
        let sources = vec![
            source("https://www.jstor.org/a", SourceKind::Article, None),
            source("https://jstor.org/b", SourceKind::Article, None),
            source("https://library.harvard.edu/c", SourceKind::Article, None),
            source("https://harvard.edu/d", SourceKind::Article, None),
        ];
        let (level, shared) = redundancy(&sources);
        assert_eq!(level, 0.5);
        assert_eq!(shared, vec!["jstor.org".to_string()]);
    }

    #[test]
    fn test_academic_compliance() {
        let sources = vec![
            source("https://www.stanford.edu/a", SourceKind::Article, None),
            source("https://www.britannica.com/b", SourceKind::Article, None),
        ];
        let (score, assessment) = academic_compliance(&sources, |s| {
            if s.url().is_some_and(|u| u.contains("stanford")) {
                95.0
            } else {
                65.0
            }
        });

        assert_eq!(assessment.academic_share, 0.5);
        assert_eq!(assessment.mean_credibility, 80.0);
        assert_eq!(assessment.peer_reviewed_count, 1);
        assert_eq!(assessment.primary_source_count, 1);
        assert!(assessment.issues.is_empty());
        assert!((score - (0.6 * 0.5 + 0.4 * 0.8)).abs() < 1e-9);
    }

    #[test]
    fn test_low_academic_share_issue() {
        let sources = vec![source("https://www.nytimes.com/a", SourceKind::Article, None)];
        let (_, assessment) = academic_compliance(&sources, |_| 60.0);
        assert_eq!(assessment.issues.len(), 2);
    }
}
