use async_trait::async_trait;

use crate::util;

/// Produces the initial candidates. All enabled sources run concurrently and
/// their outputs are concatenated in source order.
#[async_trait]
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this source should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Build candidates from the ledger rows the query scopes to.
    /// An error drops this source's contribution; other sources still count.
    async fn get_candidates(&self, query: &Q) -> Result<Vec<C>, String>;

    /// Returns a stable name for log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
