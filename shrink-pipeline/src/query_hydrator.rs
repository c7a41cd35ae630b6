use async_trait::async_trait;

use crate::util;

/// Fills in query fields before retrieval, such as a default period.
/// Query hydrators run concurrently against the original query.
#[async_trait]
pub trait QueryHydrator<Q>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
{
    /// Decide if this query hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Return a copy of the query with this hydrator's fields filled in.
    async fn hydrate(&self, query: &Q) -> Result<Q, String>;

    /// Copy only this hydrator's fields from `hydrated` onto `query`.
    fn update(&self, query: &mut Q, hydrated: Q);

    /// Returns a stable name for log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
