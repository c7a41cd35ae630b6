//! JSON output contract.

use chrono::Utc;
use serde::Serialize;

use shrink_pipeline::region::{ExecutiveSummary, GroupBy, GroupSummary};
use shrink_pipeline::util::ratio_pct;
use shrink_pipeline::{StoreAnalysis, StoreCandidate};

#[derive(Serialize)]
pub struct StoreReport {
    pub generated_at: String,
    pub periods: Vec<String>,
    pub rows_analyzed: usize,
    pub analysis_ms: u128,
    pub analysis: StoreAnalysis,
}

impl StoreReport {
    pub fn new(analysis: StoreAnalysis, periods: Vec<String>, rows_analyzed: usize, analysis_ms: u128) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            periods,
            rows_analyzed,
            analysis_ms,
            analysis,
        }
    }
}

#[derive(Serialize, Default)]
pub struct RegionTotals {
    pub store_count: usize,
    pub sales: f64,
    pub diff: f64,
    pub fire: f64,
    pub total_loss: f64,
    pub total_pct: f64,
    pub critical_stores: usize,
}

impl RegionTotals {
    fn from_stores(stores: &[StoreCandidate]) -> Self {
        let sales: f64 = stores.iter().map(|s| s.sales).sum();
        let total_loss: f64 = stores.iter().map(|s| s.total_loss).sum();
        Self {
            store_count: stores.len(),
            sales,
            diff: stores.iter().map(|s| s.diff).sum(),
            fire: stores.iter().map(|s| s.fire).sum(),
            total_loss,
            total_pct: ratio_pct(total_loss, sales),
            critical_stores: stores
                .iter()
                .filter(|s| s.risk_level == Some(shrink_pipeline::RiskLevel::Critical))
                .count(),
        }
    }
}

#[derive(Serialize)]
pub struct RegionReport {
    pub generated_at: String,
    pub periods: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub group_by: GroupBy,
    pub pipeline_ms: u128,
    /// Totals over every store in scope, before any top-N cut.
    pub totals: RegionTotals,
    pub stores: Vec<StoreCandidate>,
    pub groups: Vec<GroupSummary>,
    pub summary: ExecutiveSummary,
}

impl RegionReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        periods: Vec<String>,
        manager: Option<String>,
        group_by: GroupBy,
        pipeline_ms: u128,
        stores: Vec<StoreCandidate>,
        groups: Vec<GroupSummary>,
        summary: ExecutiveSummary,
        top: Option<usize>,
    ) -> Self {
        let totals = RegionTotals::from_stores(&stores);
        let mut stores = stores;
        if let Some(top) = top {
            stores.truncate(top);
        }
        Self {
            generated_at: Utc::now().to_rfc3339(),
            periods,
            manager,
            group_by,
            pipeline_ms,
            totals,
            stores,
            groups,
            summary,
        }
    }
}
