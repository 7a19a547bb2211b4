//! Aggregates and recommendations over a validated batch.

use std::collections::BTreeMap;

use crate::types::{SourceValidation, ValidationAggregates, ValidationOptions};

pub const NO_SOURCES_RECOMMENDATION: &str = "No sources were provided; add candidate sources to validate";
pub const ALL_CLEAR_RECOMMENDATION: &str =
    "Source set meets all validation thresholds; no changes needed";

pub fn aggregate(results: &[SourceValidation]) -> ValidationAggregates {
    let total = results.len();
    let valid = results.iter().filter(|r| r.valid).count();
    let accepted = results.iter().filter(|r| r.accepted).count();
    let trusted = results.iter().filter(|r| r.is_trusted()).count();

    let relevances: Vec<f64> = results.iter().filter_map(|r| r.relevance).collect();
    let average_relevance =
        (!relevances.is_empty()).then(|| relevances.iter().sum::<f64>() / relevances.len() as f64);
    let average_credibility = if total == 0 {
        0.0
    } else {
        results.iter().map(|r| r.credibility.overall).sum::<f64>() / total as f64
    };

    let mut categories = BTreeMap::new();
    for result in results {
        *categories
            .entry(result.credibility.category.as_str().to_string())
            .or_insert(0) += 1;
    }

    ValidationAggregates {
        total_sources: total,
        valid_sources: valid,
        invalid_sources: total - valid,
        rejected_sources: valid - results.iter().filter(|r| r.valid && r.accepted).count(),
        accepted_sources: accepted,
        average_relevance,
        average_credibility,
        categories,
        trusted_sources: trusted,
        untrusted_sources: total - trusted,
        inaccessible_sources: results.iter().filter(|r| r.accessible == Some(false)).count(),
    }
}

/// Threshold-triggered advice, in trigger order; never empty.
pub fn recommendations(
    results: &[SourceValidation],
    summary: &ValidationAggregates,
    options: &ValidationOptions,
) -> Vec<String> {
    if results.is_empty() {
        return vec![NO_SOURCES_RECOMMENDATION.to_string()];
    }
    let mut out = Vec::new();
    let total = results.len();

    if summary.invalid_sources > 0 {
        out.push(format!(
            "{} source(s) failed structural checks; every source needs a non-empty title and a well-formed URL and date",
            summary.invalid_sources
        ));
    }
    if let Some(relevance) = summary.average_relevance.filter(|r| *r < options.min_relevance) {
        out.push(format!(
            "Average relevance {:.2} is below {:.2}; prefer sources focused on the subject's life",
            relevance, options.min_relevance
        ));
    }
    if summary.average_credibility < options.min_credibility {
        out.push(format!(
            "Average credibility {:.0} is below {:.0}; prefer academic, archival and encyclopedic sources",
            summary.average_credibility, options.min_credibility
        ));
    }
    if summary.untrusted_sources > summary.trusted_sources {
        out.push(format!(
            "Untrusted sources outnumber trusted ones ({} vs {}); replace low-credibility domains",
            summary.untrusted_sources, summary.trusted_sources
        ));
    }

    let missing_authors = results
        .iter()
        .filter(|r| r.source.item.author.as_deref().map_or(true, |a| a.trim().is_empty()))
        .count();
    if missing_authors * 2 >= total {
        out.push(format!(
            "{} of {} sources lack an author; add author or publisher attribution",
            missing_authors, total
        ));
    }
    let missing_dates = results
        .iter()
        .filter(|r| r.source.item.publication_date.as_deref().map_or(true, |d| d.trim().is_empty()))
        .count();
    if missing_dates * 2 >= total {
        out.push(format!(
            "{} of {} sources lack a publication date; add dates to judge currency",
            missing_dates, total
        ));
    }

    if summary.inaccessible_sources > 0 {
        out.push(format!(
            "{} URL(s) could not be reached; replace them or cite an archived copy",
            summary.inaccessible_sources
        ));
    }

    if out.is_empty() {
        out.push(ALL_CLEAR_RECOMMENDATION.to_string());
    }
    out
}
