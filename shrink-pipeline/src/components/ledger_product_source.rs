use async_trait::async_trait;
use shrink_ledger::LedgerRow;

use crate::source::Source;
use crate::types::{AnalysisQuery, ProductCandidate};

/// One candidate per ledger row inside the query scope.
pub struct LedgerProductSource {
    rows: Vec<LedgerRow>,
}

impl LedgerProductSource {
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl Source<AnalysisQuery, ProductCandidate> for LedgerProductSource {
    async fn get_candidates(&self, query: &AnalysisQuery) -> Result<Vec<ProductCandidate>, String> {
        Ok(self
            .rows
            .iter()
            .filter(|r| query.scope.matches(r))
            .map(ProductCandidate::from_row)
            .collect())
    }
}
