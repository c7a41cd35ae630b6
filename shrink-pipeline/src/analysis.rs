//! Everything the store report shows, computed in one call.

use std::collections::HashSet;

use serde::Serialize;
use shrink_ledger::{CancellationRecord, LedgerRow, Scope};

use crate::camera::enrich_with_camera;
use crate::candidate_pipeline::CandidatePipeline;
use crate::config::RiskConfig;
use crate::detectors::{
    check_cash_register_products, detect_chronic_fire, detect_chronic_shortage, detect_cigarette_shortage,
    detect_external_theft, detect_fire_manipulation, detect_internal_theft, detect_product_families,
    CashRegisterReport, ChronicFire, ChronicShortage, CigaretteShortage, ExternalTheft, FireManipulation,
    InternalTheft, ProductFamily,
};
use crate::pipelines::risky_products::RiskyProductsPipeline;
use crate::region::{executive_summary, score_store, store_metrics, ExecutiveSummary};
use crate::store_risk::{calculate_store_risk, StoreRisk};
use crate::types::{AnalysisQuery, ProductCandidate, StoreCandidate};

#[derive(Clone, Debug, Serialize)]
pub struct StoreAnalysis {
    pub store_code: String,
    pub store_name: String,
    /// Region-style metrics, scored with the configured weights.
    pub metrics: StoreCandidate,
    pub risk: StoreRisk,
    pub risky_products: Vec<ProductCandidate>,
    pub internal_theft: Vec<InternalTheft>,
    pub chronic_shortage: Vec<ChronicShortage>,
    pub chronic_fire: Vec<ChronicFire>,
    pub cigarette: Option<CigaretteShortage>,
    pub external_theft: Vec<ExternalTheft>,
    pub families: Vec<ProductFamily>,
    pub fire_manipulation: Vec<FireManipulation>,
    pub cash_register: CashRegisterReport,
    pub summary: ExecutiveSummary,
}

/// Analyze one store's rows.
///
/// `cancellations` may be empty, in which case internal theft findings get
/// no camera hint.
pub async fn analyze_store(
    rows: &[LedgerRow],
    config: &RiskConfig,
    cash_codes: &HashSet<String>,
    cancellations: &[CancellationRecord],
) -> StoreAnalysis {
    let store_code = rows.first().map(|r| r.store_code.clone()).unwrap_or_default();

    let mut internal_theft = detect_internal_theft(rows);
    if !cancellations.is_empty() {
        enrich_with_camera(&mut internal_theft, rows, &store_code, cancellations);
    }
    let chronic_shortage = detect_chronic_shortage(rows);
    let chronic_fire = detect_chronic_fire(rows);
    let cigarette = detect_cigarette_shortage(rows);
    let external_theft = detect_external_theft(rows);
    let families = detect_product_families(rows);
    let fire_manipulation = detect_fire_manipulation(rows);
    let cash_register = check_cash_register_products(rows, cash_codes);

    let risk = calculate_store_risk(rows, &internal_theft, &chronic_shortage, cigarette.as_ref());

    let mut metrics = store_metrics(&store_code, rows, cash_codes);
    let (score, level, reasons) = score_store(&metrics, config);
    metrics.risk_score = Some(score);
    metrics.risk_level = Some(level);
    metrics.risk_reasons = reasons;

    let query = AnalysisQuery::new(format!("store-{}", store_code), Scope::default());
    let risky_products = RiskyProductsPipeline::new(rows.to_vec())
        .execute(query)
        .await
        .selected_candidates;

    let summary = executive_summary(rows, Some(&cash_register));

    log::info!(
        "Store {} analyzed: {} rows, risk {} ({}), {} internal theft, {} chronic",
        store_code,
        rows.len(),
        risk.score,
        risk.level,
        internal_theft.len(),
        chronic_shortage.len()
    );

    StoreAnalysis {
        store_name: metrics.store_name.clone(),
        store_code,
        metrics,
        risk,
        risky_products,
        internal_theft,
        chronic_shortage,
        chronic_fire,
        cigarette,
        external_theft,
        families,
        fire_manipulation,
        cash_register,
        summary,
    }
}
