//! Source discovery: run the selected strategies concurrently and merge.

use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::strategies::StrategyDispatcher;
use crate::traits::SourceStrategy;
use crate::types::{CharacterProfile, SourceCandidate, Subject};

/// Merged output of one discovery run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    /// Deduplicated candidates in strategy order
    pub candidates: Vec<SourceCandidate>,
    /// Every strategy that was run, including failed ones
    pub strategies_used: Vec<String>,
    /// Strategies that failed, with the error text
    pub failures: Vec<(String, String)>,
    pub duplicates_removed: usize,
}

impl DiscoveryReport {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Runs discovery strategies.
#[derive(Clone)]
pub struct SourceDiscovery {
    dispatcher: StrategyDispatcher,
}

impl SourceDiscovery {
    pub fn new(dispatcher: StrategyDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &StrategyDispatcher {
        &self.dispatcher
    }

    /// Run the strategies chosen for `profile`.
    pub async fn discover(
        &self,
        subject: &Subject,
        profile: Option<&CharacterProfile>,
    ) -> DiscoveryReport {
        let strategies = self.dispatcher.select(profile);
        run_strategies(&strategies, subject, profile).await
    }
}

/// Run `strategies` concurrently; a failing strategy contributes nothing.
///
/// Output keeps strategy order, then each strategy's own order, with URLs
/// deduplicated case-insensitively on first sight.
pub async fn run_strategies(
    strategies: &[Arc<dyn SourceStrategy>],
    subject: &Subject,
    profile: Option<&CharacterProfile>,
) -> DiscoveryReport {
    let futures = strategies.iter().map(|strategy| async move {
        let result = strategy.search(subject, profile).await;
        (strategy.name().to_string(), result)
    });
    let results = join_all(futures).await;

    let mut report = DiscoveryReport::default();
    let mut batches = Vec::with_capacity(results.len());
    for (name, result) in results {
        match result {
            Ok(candidates) => {
                debug!(strategy = %name, count = candidates.len(), "Strategy finished");
                batches.push(candidates);
            }
            Err(e) => {
                warn!(strategy = %name, error = %e, "Strategy failed, skipping");
                report.failures.push((name.clone(), e.to_string()));
            }
        }
        report.strategies_used.push(name);
    }

    let total: usize = batches.iter().map(Vec::len).sum();
    report.candidates = dedup_by_url(batches.into_iter().flatten());
    report.duplicates_removed = total - report.candidates.len();

    info!(
        subject = %subject,
        strategies = report.strategies_used.len(),
        failed = report.failures.len(),
        candidates = report.candidates.len(),
        duplicates = report.duplicates_removed,
        "Discovery complete"
    );
    report
}

/// Keep the first candidate per case-insensitive URL; URL-less candidates
/// are kept as-is.
pub fn dedup_by_url(candidates: impl IntoIterator<Item = SourceCandidate>) -> Vec<SourceCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| match c.dedup_key() {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStrategy;
    use crate::types::SourceItem;

    fn candidate(url: &str) -> SourceCandidate {
        SourceCandidate::new(SourceItem::web("Ada Lovelace", url))
    }

    #[tokio::test]
    async fn test_merges_in_strategy_order_and_dedups() {
        let strategies: Vec<Arc<dyn SourceStrategy>> = vec![
            Arc::new(MockStrategy::new(
                "first",
                vec![candidate("https://archive.org/a"), candidate("https://loc.gov/b")],
            )),
            Arc::new(MockStrategy::failing("broken")),
            Arc::new(MockStrategy::new(
                "second",
                vec![candidate("https://ARCHIVE.org/a"), candidate("https://bl.uk/c")],
            )),
        ];
        let subject = Subject::parse("Ada Lovelace").unwrap();

        let report = run_strategies(&strategies, &subject, None).await;
        let urls: Vec<_> = report.candidates.iter().filter_map(|c| c.url()).collect();

        assert_eq!(urls, vec!["https://archive.org/a", "https://loc.gov/b", "https://bl.uk/c"]);
        assert_eq!(report.strategies_used, vec!["first", "broken", "second"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.duplicates_removed, 1);
    }

    #[tokio::test]
    async fn test_all_failing_is_empty() {
        let strategies: Vec<Arc<dyn SourceStrategy>> = vec![Arc::new(MockStrategy::failing("x"))];
        let subject = Subject::parse("Ada Lovelace").unwrap();

        let report = run_strategies(&strategies, &subject, None).await;
        assert!(report.is_empty());
    }

    #[test]
    fn test_dedup_keeps_urlless() {
        let out = dedup_by_url(vec![
            SourceCandidate::default(),
            SourceCandidate::default(),
            candidate("https://loc.gov/b"),
        ]);
        assert_eq!(out.len(), 3);
    }
}
