//! Multi-period patterns: shortages and fire recorded in both the current and
//! the prior count.

use serde::Serialize;
use shrink_ledger::{approx_zero, LedgerRow};

use super::dedup_by_code;

/// A product short in this count and in the previous one.
#[derive(Clone, Debug, Serialize)]
pub struct ChronicShortage {
    pub product_code: String,
    pub product_name: String,
    pub product_group: String,
    pub diff_qty: f64,
    pub diff_amount: f64,
    pub prior_diff_qty: f64,
    pub prior_diff_amount: f64,
    /// Current plus prior diff amount.
    pub total_amount: f64,
}

pub fn detect_chronic_shortage(rows: &[LedgerRow]) -> Vec<ChronicShortage> {
    let findings = rows
        .iter()
        .filter(|r| !r.is_balanced())
        .filter(|r| r.prior_diff_qty < 0.0 && r.diff_qty < 0.0)
        .map(|r| ChronicShortage {
            product_code: r.product_code.clone(),
            product_name: r.product_name.clone(),
            product_group: r.product_group.clone(),
            diff_qty: r.diff_qty,
            diff_amount: r.diff_amount,
            prior_diff_qty: r.prior_diff_qty,
            prior_diff_amount: r.prior_diff_amount,
            total_amount: r.diff_amount + r.prior_diff_amount,
        })
        .collect();

    let mut findings = dedup_by_code(findings, |f: &ChronicShortage| f.product_code.as_str());
    findings.sort_by(|a, b| a.diff_amount.total_cmp(&b.diff_amount));
    findings
}

/// A product with fire recorded in both counts while its diff does not
/// net out.
#[derive(Clone, Debug, Serialize)]
pub struct ChronicFire {
    pub product_code: String,
    pub product_name: String,
    pub product_group: String,
    pub fire_qty: f64,
    pub fire_amount: f64,
    pub prior_fire_qty: f64,
    pub prior_fire_amount: f64,
    pub total_fire_amount: f64,
}

pub fn detect_chronic_fire(rows: &[LedgerRow]) -> Vec<ChronicFire> {
    let findings = rows
        .iter()
        .filter(|r| !approx_zero(r.prior_fire_qty) && !approx_zero(r.fire_qty))
        .filter(|r| !approx_zero(r.prior_diff_qty + r.diff_qty))
        .map(|r| ChronicFire {
            product_code: r.product_code.clone(),
            product_name: r.product_name.clone(),
            product_group: r.product_group.clone(),
            fire_qty: r.fire_qty,
            fire_amount: r.fire_amount,
            prior_fire_qty: r.prior_fire_qty,
            prior_fire_amount: r.prior_fire_amount,
            total_fire_amount: r.fire_amount + r.prior_fire_amount,
        })
        .collect();

    let mut findings = dedup_by_code(findings, |f: &ChronicFire| f.product_code.as_str());
    findings.sort_by(|a, b| a.fire_amount.total_cmp(&b.fire_amount));
    findings
}
