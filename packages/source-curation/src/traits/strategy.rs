//! Discovery strategy contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CharacterProfile, SourceCandidate, Subject};

/// A source-discovery strategy.
///
/// Every emitted candidate carries `quality_score`, `relevance_score`,
/// `credibility_score` and `metadata.domain`. Order within one strategy's
/// output is preserved by discovery. Unknown fields degrade to a generic
/// query instead of failing.
#[async_trait]
pub trait SourceStrategy: Send + Sync {
    /// Stable name reported in `strategies_used`.
    fn name(&self) -> &str;

    async fn search(
        &self,
        subject: &Subject,
        profile: Option<&CharacterProfile>,
    ) -> Result<Vec<SourceCandidate>>;
}
