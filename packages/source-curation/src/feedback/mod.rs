//! Quality-feedback store.
//!
//! Learns which source features accompany high-quality biographies, keeps
//! scoring weights and domain priorities derived from that history, and
//! persists every learned case to a JSON tracking document.

pub mod patterns;
pub mod persistence;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::types::{
    AggregatedPattern, BiographyQuality, Dashboard, FeedbackRecommendations, ImprovementMetrics, PatternKind,
    QualityWeights, SourceCandidate, Subject, SuccessCase, TimeSeriesPoint,
};
use crate::types::feedback::SUCCESS_THRESHOLD;

pub use patterns::{aggregate_patterns, identify_patterns, priorities, top_patterns};

pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
/// Longest lookback window accepted from callers.
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;
/// Cases needed before a trend is reported.
pub const MIN_TREND_CASES: usize = 10;
pub const TOP_PATTERNS: usize = 5;

const CONTENT_QUALITY_STEP: f64 = 0.05;
const CONTENT_QUALITY_CAP: f64 = 0.35;
const CITATIONS_STEP: f64 = 0.03;
const CITATIONS_CAP: f64 = 0.20;

struct State {
    cases: Vec<SuccessCase>,
    weights: QualityWeights,
}

/// Process-wide learning store; `learn` is serialized by an internal lock.
pub struct FeedbackStore {
    path: Option<PathBuf>,
    state: Mutex<State>,
}

impl Default for FeedbackStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl FeedbackStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::with_cases(None, Vec::new())
    }

    /// Load the tracking document at `path`.
    ///
    /// A missing or unreadable document starts an empty history; the error
    /// is logged.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cases = match persistence::load(&path) {
            Ok(cases) => {
                info!(path = %path.display(), cases = cases.len(), "Loaded quality tracking data");
                cases
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load quality tracking data");
                Vec::new()
            }
        };
        Self::with_cases(Some(path), cases)
    }

    fn with_cases(path: Option<PathBuf>, cases: Vec<SuccessCase>) -> Self {
        let mut weights = QualityWeights::default();
        for seen in 1..=cases.len() {
            adjust_weights(&mut weights, &aggregate_patterns(&cases[..seen]));
        }
        Self {
            path,
            state: Mutex::new(State { cases, weights }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.lock().cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cases(&self) -> Vec<SuccessCase> {
        self.lock().cases.clone()
    }

    pub fn weights(&self) -> QualityWeights {
        self.lock().weights.clone()
    }

    /// Learned mean biography score per domain.
    pub fn domain_priorities(&self) -> BTreeMap<String, f64> {
        priorities(&self.lock().cases, PatternKind::Domain)
    }

    /// Record one run and update weights.
    pub fn learn(
        &self,
        subject: &Subject,
        sources: &[SourceCandidate],
        quality: &BiographyQuality,
    ) -> SuccessCase {
        self.learn_at(subject, sources, quality, Utc::now())
    }

    /// [`learn`](Self::learn) with an explicit case timestamp.
    pub fn learn_at(
        &self,
        subject: &Subject,
        sources: &[SourceCandidate],
        quality: &BiographyQuality,
        timestamp: DateTime<Utc>,
    ) -> SuccessCase {
        let patterns = identify_patterns(sources, quality.overall_score);
        let mut metadata = Map::new();
        metadata.insert("identifier".into(), json!(subject.identifier()));
        metadata.insert("patterns_found".into(), json!(patterns.len()));
        if !quality.details.is_empty() {
            metadata.insert("quality_details".into(), quality.details.clone().into());
        }

        let case = SuccessCase {
            character: subject.to_string(),
            quality_score: quality.overall_score,
            source_count: sources.len(),
            patterns,
            timestamp,
            metadata,
        };

        let mut state = self.lock();
        state.cases.push(case.clone());
        let aggregated = aggregate_patterns(&state.cases);
        adjust_weights(&mut state.weights, &aggregated);
        if let Some(path) = &self.path {
            if let Err(e) = persistence::save(path, &state.cases) {
                warn!(path = %path.display(), error = %e, "Failed to save quality tracking data");
            }
        }
        info!(
            subject = %subject,
            score = case.quality_score,
            patterns = case.patterns.len(),
            total_cases = state.cases.len(),
            "Learned from biography"
        );
        case
    }

    pub fn improvement_metrics(&self, lookback_days: i64) -> ImprovementMetrics {
        self.improvement_metrics_at(lookback_days, Utc::now())
    }

    /// Metrics as seen at `now`.
    pub fn improvement_metrics_at(&self, lookback_days: i64, now: DateTime<Utc>) -> ImprovementMetrics {
        let state = self.lock();
        metrics(&state.cases, lookback_days, now)
    }

    pub fn recommendations(&self) -> FeedbackRecommendations {
        let state = self.lock();
        let metrics = metrics(&state.cases, DEFAULT_LOOKBACK_DAYS, Utc::now());
        FeedbackRecommendations {
            priority_domains: priorities(&state.cases, PatternKind::Domain),
            priority_source_types: priorities(&state.cases, PatternKind::SourceType),
            quality_weights: state.weights.clone(),
            top_patterns: metrics.top_patterns,
            success_rate: metrics.success_rate,
            trend: metrics.trend,
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        let recommendations = self.recommendations();
        let state = self.lock();
        let metrics = metrics(&state.cases, DEFAULT_LOOKBACK_DAYS, Utc::now());

        let mut days: BTreeMap<_, (usize, f64)> = BTreeMap::new();
        for case in &state.cases {
            let day = days.entry(case.timestamp.date_naive()).or_insert((0, 0.0));
            day.0 += 1;
            day.1 += case.quality_score;
        }
        let time_series = days
            .into_iter()
            .map(|(date, (cases, total))| TimeSeriesPoint {
                date,
                cases,
                mean_score: total / cases as f64,
            })
            .collect();

        Dashboard {
            metrics,
            time_series,
            recommendations,
            total_cases: state.cases.len(),
            generated_at: Utc::now(),
        }
    }
}

fn metrics(cases: &[SuccessCase], lookback_days: i64, now: DateTime<Utc>) -> ImprovementMetrics {
    // A window reaching past the representable range covers every case.
    let cutoff = Duration::try_days(lookback_days.max(0)).and_then(|d| now.checked_sub_signed(d));
    let (recent, older): (Vec<&SuccessCase>, Vec<&SuccessCase>) = cases
        .iter()
        .partition(|c| cutoff.map_or(true, |cutoff| c.timestamp >= cutoff));

    let aggregated = aggregate_patterns(cases);
    let success_pool: Vec<&SuccessCase> = if recent.is_empty() {
        cases.iter().collect()
    } else {
        recent.clone()
    };
    let success_rate = if success_pool.is_empty() {
        0.0
    } else {
        success_pool
            .iter()
            .filter(|c| c.quality_score >= SUCCESS_THRESHOLD)
            .count() as f64
            / success_pool.len() as f64
    };

    ImprovementMetrics {
        total_cases: cases.len(),
        recent_cases: recent.len(),
        lookback_days,
        average_quality: mean(cases.iter()),
        trend: trend(cases, &recent, &older),
        success_rate,
        patterns_identified: aggregated.len(),
        top_patterns: top_patterns(aggregated, TOP_PATTERNS),
    }
}

/// Recent mean minus older mean; chronological halves when the window
/// leaves one side empty.
fn trend(cases: &[SuccessCase], recent: &[&SuccessCase], older: &[&SuccessCase]) -> f64 {
    if cases.len() < MIN_TREND_CASES {
        return 0.0;
    }
    if !recent.is_empty() && !older.is_empty() {
        return mean(recent.iter().copied()) - mean(older.iter().copied());
    }
    let mut sorted: Vec<&SuccessCase> = cases.iter().collect();
    sorted.sort_by_key(|c| c.timestamp);
    let (first, second) = sorted.split_at(sorted.len() / 2);
    debug!("Lookback window split one-sided; using chronological halves");
    mean(second.iter().copied()) - mean(first.iter().copied())
}

fn mean<'a>(cases: impl Iterator<Item = &'a SuccessCase>) -> f64 {
    let (n, total) = cases.fold((0usize, 0.0), |(n, t), c| (n + 1, t + c.quality_score));
    if n == 0 {
        0.0
    } else {
        total / n as f64
    }
}

/// Nudge weights toward what the aggregated case history rewards, then
/// normalize.
fn adjust_weights(weights: &mut QualityWeights, aggregated: &[AggregatedPattern]) {
    let thresholds: Vec<f64> = aggregated
        .iter()
        .filter(|p| p.kind == PatternKind::QualityThreshold)
        .map(|p| p.confidence)
        .collect();
    if !thresholds.is_empty() && thresholds.iter().sum::<f64>() / thresholds.len() as f64 > 0.7 {
        weights.content_quality = (weights.content_quality + CONTENT_QUALITY_STEP).min(CONTENT_QUALITY_CAP);
    }

    let metadata: Vec<&AggregatedPattern> = aggregated
        .iter()
        .filter(|p| p.kind == PatternKind::Metadata)
        .collect();
    let top_occurrences = metadata.iter().map(|p| p.occurrences).max().unwrap_or(0);
    let publisher_dominates = metadata.iter().any(|p| {
        p.value == patterns::PUBLISHER_VALUE && p.occurrences == top_occurrences && p.confidence > 0.5
    });
    if publisher_dominates {
        weights.citations = (weights.citations + CITATIONS_STEP).min(CITATIONS_CAP);
    }

    weights.normalize();
}
