//! Pattern extraction from one run's sources and aggregation across runs.

use std::collections::BTreeMap;

use crate::registry::is_academic_url;
use crate::types::{AggregatedPattern, PatternKind, SourceCandidate, SuccessCase, SuccessPattern};

/// A feature must repeat at least this often in a run to count.
pub const MIN_PATTERN_FREQUENCY: usize = 2;
/// Candidate quality counted by the high-quality threshold pattern.
pub const HIGH_QUALITY_SCORE: f64 = 85.0;
pub const HIGH_QUALITY_VALUE: &str = "high_quality_sources";
pub const PUBLISHER_VALUE: &str = "has_publisher";

/// Patterns repeated across `sources`, each tagged with the biography's
/// overall score.
pub fn identify_patterns(sources: &[SourceCandidate], overall_score: f64) -> Vec<SuccessPattern> {
    let n = sources.len();
    if n == 0 {
        return Vec::new();
    }
    let pattern = |kind, value: String, frequency: usize| SuccessPattern {
        kind,
        value,
        frequency,
        avg_quality_impact: overall_score,
        confidence: (frequency as f64 / n as f64).min(1.0),
    };
    let mut patterns = Vec::new();

    let mut domains: BTreeMap<String, usize> = BTreeMap::new();
    let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
    for source in sources {
        if let Some(host) = source.host() {
            *domains.entry(host).or_insert(0) += 1;
        }
        *kinds.entry(source.item.kind.as_str()).or_insert(0) += 1;
    }
    patterns.extend(
        domains
            .into_iter()
            .filter(|(_, f)| *f >= MIN_PATTERN_FREQUENCY)
            .map(|(host, f)| pattern(PatternKind::Domain, host, f)),
    );
    patterns.extend(
        kinds
            .into_iter()
            .filter(|(_, f)| *f >= MIN_PATTERN_FREQUENCY)
            .map(|(kind, f)| pattern(PatternKind::SourceType, kind.to_string(), f)),
    );

    let scores: Vec<f64> = sources.iter().filter_map(|s| s.quality_score).collect();
    let high = scores.iter().filter(|q| **q >= HIGH_QUALITY_SCORE).count();
    if high >= MIN_PATTERN_FREQUENCY {
        patterns.push(pattern(PatternKind::QualityThreshold, HIGH_QUALITY_VALUE.to_string(), high));
    }
    if scores.len() >= MIN_PATTERN_FREQUENCY {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        patterns.push(pattern(
            PatternKind::QualityThreshold,
            format!("avg_quality_{}", quality_bucket(mean)),
            scores.len(),
        ));
    }

    let flags: [(&str, fn(&SourceCandidate) -> bool); 5] = [
        ("has_author", |s| s.item.author.as_deref().is_some_and(|a| !a.trim().is_empty())),
        ("has_date", |s| {
            s.item
                .publication_date
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty())
        }),
        (PUBLISHER_VALUE, |s| s.meta_str("publisher").is_some_and(|p| !p.trim().is_empty())),
        ("academic", |s| s.url().is_some_and(is_academic_url)),
        ("peer_reviewed", |s| s.meta_bool("peer_reviewed")),
    ];
    for (value, present) in flags {
        let f = sources.iter().filter(|s| present(s)).count();
        if f >= MIN_PATTERN_FREQUENCY {
            patterns.push(pattern(PatternKind::Metadata, value.to_string(), f));
        }
    }

    patterns
}

fn quality_bucket(mean: f64) -> &'static str {
    match mean {
        m if m >= 90.0 => "excellent",
        m if m >= 80.0 => "good",
        m if m >= 70.0 => "fair",
        _ => "poor",
    }
}

/// Merge identical patterns across cases, averaging impact and confidence.
pub fn aggregate_patterns(cases: &[SuccessCase]) -> Vec<AggregatedPattern> {
    let mut groups: BTreeMap<(PatternKind, &str), (usize, f64, f64)> = BTreeMap::new();
    for pattern in cases.iter().flat_map(|c| &c.patterns) {
        let entry = groups
            .entry((pattern.kind, pattern.value.as_str()))
            .or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += pattern.avg_quality_impact;
        entry.2 += pattern.confidence;
    }
    groups
        .into_iter()
        .map(|((kind, value), (n, impact, confidence))| AggregatedPattern {
            kind,
            value: value.to_string(),
            occurrences: n,
            avg_quality_impact: impact / n as f64,
            confidence: confidence / n as f64,
        })
        .collect()
}

/// The `n` best patterns by `impact × confidence`.
pub fn top_patterns(mut aggregated: Vec<AggregatedPattern>, n: usize) -> Vec<AggregatedPattern> {
    aggregated.sort_by(|a, b| b.rank().total_cmp(&a.rank()));
    aggregated.truncate(n);
    aggregated
}

/// Running mean impact per pattern value of one kind.
pub fn priorities(cases: &[SuccessCase], kind: PatternKind) -> BTreeMap<String, f64> {
    aggregate_patterns(cases)
        .into_iter()
        .filter(|p| p.kind == kind)
        .map(|p| (p.value, p.avg_quality_impact))
        .collect()
}
