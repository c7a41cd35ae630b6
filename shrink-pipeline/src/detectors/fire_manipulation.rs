//! Fire recorded on products that are actually in surplus.

use serde::Serialize;
use shrink_ledger::{approx_zero, LedgerRow};

use super::dedup_by_code;

#[derive(Clone, Debug, Serialize)]
pub struct FireManipulation {
    pub product_code: String,
    pub product_name: String,
    pub product_group: String,
    pub diff_qty: f64,
    pub partial_qty: f64,
    pub prior_diff_qty: f64,
    pub diff_plus_partial: f64,
    pub fire_qty: f64,
    pub fire_amount: f64,
    pub verdict: &'static str,
}

pub fn detect_fire_manipulation(rows: &[LedgerRow]) -> Vec<FireManipulation> {
    let findings = rows
        .iter()
        .filter(|r| !approx_zero(r.prior_diff_qty + r.diff_qty))
        .filter(|r| r.fire_qty < 0.0 && r.diff_qty + r.partial_qty > 0.0)
        .map(|r| FireManipulation {
            product_code: r.product_code.clone(),
            product_name: r.product_name.clone(),
            product_group: r.product_group.clone(),
            diff_qty: r.diff_qty,
            partial_qty: r.partial_qty,
            prior_diff_qty: r.prior_diff_qty,
            diff_plus_partial: r.diff_qty + r.partial_qty,
            fire_qty: r.fire_qty,
            fire_amount: r.fire_amount,
            verdict: "excess fire recorded",
        })
        .collect();

    let mut findings = dedup_by_code(findings, |f: &FireManipulation| f.product_code.as_str());
    findings.sort_by(|a, b| a.fire_amount.total_cmp(&b.fire_amount));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, diff: f64, partial: f64, prior: f64, fire: f64) -> LedgerRow {
        LedgerRow {
            product_code: code.into(),
            diff_qty: diff,
            partial_qty: partial,
            prior_diff_qty: prior,
            fire_qty: fire,
            fire_amount: fire * 12.0,
            ..Default::default()
        }
    }

    #[test]
    fn fire_on_surplus_is_flagged() {
        let rows = vec![
            row("A", 2.0, 0.0, 0.0, -1.0),
            row("B", 1.0, 1.0, 0.0, -5.0),
            row("C", -2.0, 0.0, 0.0, -3.0),
            row("D", 2.0, 0.0, -2.0, -3.0),
            row("E", 2.0, 0.0, 0.0, 0.0),
        ];
        let found = detect_fire_manipulation(&rows);
        let codes: Vec<_> = found.iter().map(|f| f.product_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A"]);
        assert!((found[0].diff_plus_partial - 2.0).abs() < 0.01);
    }
}
