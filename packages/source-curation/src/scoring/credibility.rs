//! Composite credibility: domain authority, metadata completeness, recency.

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

use crate::registry::{DomainRegistry, EditorialProcess, SourceCategory, DEFAULT_AUTHORITY};
use crate::types::SourceItem;

/// Recency assumed for undated sources.
pub const UNDATED_RECENCY: f64 = 70.0;
/// Age at which a source draws a currency warning.
pub const OLD_SOURCE_YEARS: i32 = 50;

const DOMAIN_WEIGHT: f64 = 0.5;
const COMPLETENESS_WEIGHT: f64 = 0.3;
const RECENCY_WEIGHT: f64 = 0.2;

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

/// Credibility of one source on [0, 100], with its components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredibilityAssessment {
    pub overall: f64,
    pub domain_score: f64,
    pub completeness_score: f64,
    pub recency_score: f64,
    pub category: SourceCategory,
    /// Registry entry the host resolved to
    pub premium_domain: Option<&'static str>,
    pub editorial_process: Option<EditorialProcess>,
    pub age_years: Option<i32>,
    pub warnings: Vec<String>,
}

impl CredibilityAssessment {
    pub fn is_peer_reviewed(&self) -> bool {
        self.editorial_process == Some(EditorialProcess::PeerReviewed)
    }
}

/// Scores sources against the domain registry.
#[derive(Debug, Clone)]
pub struct CredibilityScorer {
    registry: Arc<DomainRegistry>,
    current_year: Option<i32>,
}

impl CredibilityScorer {
    pub fn new(registry: Arc<DomainRegistry>) -> Self {
        Self {
            registry,
            current_year: None,
        }
    }

    /// Pin "now" for deterministic ages.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn registry(&self) -> &Arc<DomainRegistry> {
        &self.registry
    }

    pub fn assess(&self, item: &SourceItem) -> CredibilityAssessment {
        let entry = item.url.as_deref().and_then(|u| self.registry.lookup(u));
        let domain_score = entry
            .map(|e| e.authority)
            .unwrap_or(DEFAULT_AUTHORITY) as f64;
        let completeness_score = item.completeness() * 100.0;

        let current_year = self.current_year.unwrap_or_else(|| Utc::now().year());
        let age_years = item
            .publication_date
            .as_deref()
            .and_then(publication_year)
            .map(|year| (current_year - year).max(0));
        let recency_score = recency_score(age_years);

        let mut warnings = Vec::new();
        if let Some(age) = age_years.filter(|a| *a >= OLD_SOURCE_YEARS) {
            warnings.push(format!(
                "Source is {} years old; interpretations may be outdated",
                age
            ));
        }
        if entry.is_none() && item.url.is_some() {
            warnings.push("Domain is not in the premium registry".to_string());
        }

        let overall = (DOMAIN_WEIGHT * domain_score
            + COMPLETENESS_WEIGHT * completeness_score
            + RECENCY_WEIGHT * recency_score)
            .clamp(0.0, 100.0);

        CredibilityAssessment {
            overall,
            domain_score,
            completeness_score,
            recency_score,
            category: entry.map(|e| e.category()).unwrap_or(SourceCategory::Other),
            premium_domain: entry.map(|e| e.domain),
            editorial_process: entry.map(|e| e.editorial_process),
            age_years,
            warnings,
        }
    }
}

/// Step function over age in years; undated sources score [`UNDATED_RECENCY`].
pub fn recency_score(age_years: Option<i32>) -> f64 {
    match age_years {
        None => UNDATED_RECENCY,
        Some(age) if age < 5 => 100.0,
        Some(age) if age < 10 => 90.0,
        Some(age) if age < 20 => 75.0,
        Some(age) if age < 50 => 60.0,
        Some(_) => 40.0,
    }
}

/// First four-digit year in a free-form date.
pub fn publication_year(date: &str) -> Option<i32> {
    YEAR.captures(date)?.get(1)?.as_str().parse().ok()
}
