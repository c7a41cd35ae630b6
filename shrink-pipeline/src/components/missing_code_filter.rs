use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{AnalysisQuery, ProductCandidate};

/// Drops rows without a product code.
pub struct MissingCodeFilter;

#[async_trait]
impl Filter<AnalysisQuery, ProductCandidate> for MissingCodeFilter {
    async fn filter(
        &self,
        _query: &AnalysisQuery,
        candidates: Vec<ProductCandidate>,
    ) -> Result<FilterResult<ProductCandidate>, String> {
        Ok(FilterResult::partition(candidates, |c| {
            !c.product_code.trim().is_empty()
        }))
    }
}
