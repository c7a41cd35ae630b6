use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rayon::prelude::*;
use shrink_ledger::filter::filter_rows;
use shrink_ledger::loader::group_by_store;
use shrink_ledger::LedgerRow;

use crate::region::store_metrics;
use crate::source::Source;
use crate::types::{AnalysisQuery, StoreCandidate};

/// One candidate per store in scope, metrics computed in parallel.
pub struct StoreMetricsSource {
    rows: Arc<Vec<LedgerRow>>,
    cash_codes: Arc<HashSet<String>>,
}

impl StoreMetricsSource {
    pub fn new(rows: Arc<Vec<LedgerRow>>, cash_codes: Arc<HashSet<String>>) -> Self {
        Self { rows, cash_codes }
    }
}

#[async_trait]
impl Source<AnalysisQuery, StoreCandidate> for StoreMetricsSource {
    async fn get_candidates(&self, query: &AnalysisQuery) -> Result<Vec<StoreCandidate>, String> {
        let scoped = filter_rows(&self.rows, &query.scope);
        if scoped.is_empty() {
            return Err(format!("no rows match scope {:?}", query.scope));
        }

        let stores: Vec<(String, Vec<LedgerRow>)> = group_by_store(&scoped)
            .into_iter()
            .filter(|(code, _)| !code.is_empty())
            .collect();
        let cash_codes = &self.cash_codes;
        Ok(stores
            .par_iter()
            .map(|(code, rows)| store_metrics(code, rows, cash_codes))
            .collect())
    }
}
