// Risky products
pub mod detector_flag_hydrator;
pub mod ledger_product_source;
pub mod missing_code_filter;
pub mod risk_point_scorer;
pub mod top_risk_selector;

// Region digest
pub mod latest_period_query_hydrator;
pub mod risk_score_selector;
pub mod store_metrics_source;
pub mod weighted_risk_scorer;

pub mod selection_log_side_effect;
