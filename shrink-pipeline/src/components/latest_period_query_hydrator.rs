use async_trait::async_trait;
use shrink_ledger::filter::available_periods;
use shrink_ledger::LedgerRow;

use crate::query_hydrator::QueryHydrator;
use crate::types::AnalysisQuery;

/// Defaults an unscoped query to the latest period in the ledger.
pub struct LatestPeriodQueryHydrator {
    latest: Option<String>,
}

impl LatestPeriodQueryHydrator {
    pub fn new(rows: &[LedgerRow]) -> Self {
        Self {
            latest: available_periods(rows).into_iter().next(),
        }
    }
}

#[async_trait]
impl QueryHydrator<AnalysisQuery> for LatestPeriodQueryHydrator {
    fn enable(&self, query: &AnalysisQuery) -> bool {
        query.scope.periods.is_empty()
    }

    async fn hydrate(&self, query: &AnalysisQuery) -> Result<AnalysisQuery, String> {
        let mut hydrated = query.clone();
        if let Some(latest) = &self.latest {
            log::info!("request_id={} defaulting to period {}", query.request_id, latest);
            hydrated.scope.periods = vec![latest.clone()];
        }
        Ok(hydrated)
    }

    fn update(&self, query: &mut AnalysisQuery, hydrated: AnalysisQuery) {
        query.scope.periods = hydrated.scope.periods;
    }
}
