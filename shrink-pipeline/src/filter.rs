use async_trait::async_trait;

use crate::util;

/// Candidates a filter kept and the ones it dropped.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

impl<C> FilterResult<C> {
    /// Split `candidates` on `keep`, preserving order on both sides.
    pub fn partition(candidates: Vec<C>, keep: impl Fn(&C) -> bool) -> Self {
        let (kept, removed) = candidates.into_iter().partition(|c| keep(c));
        Self { kept, removed }
    }
}

/// Filters run one after another; each sees only what the previous kept.
#[async_trait]
pub trait Filter<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this filter should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Split candidates into the ones that go on to hydration and scoring
    /// and the ones reported as removed. On error the pipeline keeps the
    /// input unchanged.
    async fn filter(&self, query: &Q, candidates: Vec<C>) -> Result<FilterResult<C>, String>;

    /// Returns a stable name for log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
