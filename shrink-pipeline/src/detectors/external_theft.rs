//! Shortages with no fire and no till cancellations to explain them:
//! shoplifting or a counting error.

use serde::Serialize;
use shrink_ledger::{approx_zero, LedgerRow};

/// Minimum absolute diff amount for a shortage to be reported.
const MIN_AMOUNT: f64 = 50.0;

#[derive(Clone, Debug, Serialize)]
pub struct ExternalTheft {
    pub product_code: String,
    pub product_name: String,
    pub product_group: String,
    pub diff_qty: f64,
    pub diff_amount: f64,
    pub prior_diff_qty: f64,
}

/// Unlike the other detectors, repeated product codes are all reported.
pub fn detect_external_theft(rows: &[LedgerRow]) -> Vec<ExternalTheft> {
    let mut findings: Vec<ExternalTheft> = rows
        .iter()
        .filter(|r| !r.is_balanced())
        .filter(|r| r.diff_qty < 0.0 && approx_zero(r.fire_qty) && approx_zero(r.cancelled_qty))
        .filter(|r| r.diff_amount.abs() > MIN_AMOUNT)
        .map(|r| ExternalTheft {
            product_code: r.product_code.clone(),
            product_name: r.product_name.clone(),
            product_group: r.product_group.clone(),
            diff_qty: r.diff_qty,
            diff_amount: r.diff_amount,
            prior_diff_qty: r.prior_diff_qty,
        })
        .collect();
    findings.sort_by(|a, b| a.diff_amount.total_cmp(&b.diff_amount));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexplained_shortages_only() {
        let row = |code: &str, amount: f64, fire: f64, cancelled: f64| LedgerRow {
            product_code: code.into(),
            diff_qty: -1.0,
            diff_amount: amount,
            fire_qty: fire,
            cancelled_qty: cancelled,
            ..Default::default()
        };
        let rows = vec![
            row("A", -60.0, 0.0, 0.0),
            row("A", -80.0, 0.0, 0.0),
            row("SMALL", -50.0, 0.0, 0.0),
            row("FIRE", -500.0, -1.0, 0.0),
            row("TILL", -500.0, 0.0, 1.0),
        ];
        let found = detect_external_theft(&rows);
        assert_eq!(found.len(), 2);
        assert!((found[0].diff_amount - (-80.0)).abs() < 0.01);
    }
}
