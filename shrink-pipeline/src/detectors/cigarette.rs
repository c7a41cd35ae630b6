//! Cigarette category shortage.
//!
//! Tobacco is counted as a whole: code mix-ups between brands cancel out, so
//! only a negative net over every tobacco row is a shortage.

use serde::Serialize;
use shrink_ledger::{approx_zero, LedgerRow};

use super::{dedup_by_code, is_cigarette};

#[derive(Clone, Debug, Serialize)]
pub struct CigaretteLine {
    pub product_code: String,
    pub product_name: String,
    pub diff_qty: f64,
    pub partial_qty: f64,
    pub prior_diff_qty: f64,
    pub product_total: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CigaretteShortage {
    /// Tobacco rows with any movement, most negative first.
    pub lines: Vec<CigaretteLine>,
    pub total_diff: f64,
    pub total_partial: f64,
    pub total_prior: f64,
    /// Sum of the three totals; always negative for a finding.
    pub net_total: f64,
}

impl CigaretteShortage {
    /// Shortage in units.
    pub fn shortage_units(&self) -> f64 {
        self.net_total.abs()
    }
}

/// `None` when the store has no tobacco rows or tobacco nets to zero or above.
pub fn detect_cigarette_shortage(rows: &[LedgerRow]) -> Option<CigaretteShortage> {
    let tobacco: Vec<&LedgerRow> = rows.iter().filter(|r| is_cigarette(r)).collect();
    if tobacco.is_empty() {
        return None;
    }

    let total_diff: f64 = tobacco.iter().map(|r| r.diff_qty).sum();
    let total_partial: f64 = tobacco.iter().map(|r| r.partial_qty).sum();
    let total_prior: f64 = tobacco.iter().map(|r| r.prior_diff_qty).sum();
    let net_total = total_diff + total_partial + total_prior;
    if net_total >= 0.0 {
        return None;
    }

    let lines = tobacco
        .iter()
        .filter(|r| {
            !approx_zero(r.diff_qty) || !approx_zero(r.partial_qty) || !approx_zero(r.prior_diff_qty)
        })
        .map(|r| CigaretteLine {
            product_code: r.product_code.clone(),
            product_name: r.product_name.clone(),
            diff_qty: r.diff_qty,
            partial_qty: r.partial_qty,
            prior_diff_qty: r.prior_diff_qty,
            product_total: r.total_qty(),
        })
        .collect();
    let mut lines = dedup_by_code(lines, |l: &CigaretteLine| l.product_code.as_str());
    lines.sort_by(|a, b| a.product_total.total_cmp(&b.product_total));

    Some(CigaretteShortage {
        lines,
        total_diff,
        total_partial,
        total_prior,
        net_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, group: &str, diff: f64, partial: f64, prior: f64) -> LedgerRow {
        LedgerRow {
            product_code: code.into(),
            product_group: group.into(),
            diff_qty: diff,
            partial_qty: partial,
            prior_diff_qty: prior,
            ..Default::default()
        }
    }

    #[test]
    fn brand_swaps_cancel_out() {
        let rows = vec![
            row("M1", "SİGARA", -3.0, 0.0, 0.0),
            row("M2", "SİGARA", 3.0, 0.0, 0.0),
            row("X", "İÇECEK", -10.0, 0.0, 0.0),
        ];
        assert!(detect_cigarette_shortage(&rows).is_none());
    }

    #[test]
    fn net_shortage_lists_moving_lines() {
        let rows = vec![
            row("M1", "SİGARA", -5.0, 1.0, 0.0),
            row("M2", "Sigara", 2.0, 0.0, 0.0),
            row("M3", "SIGARA", 0.0, 0.0, 0.0),
            row("T1", "TÜTÜN", 0.0, 0.0, -1.0),
            row("X", "İÇECEK", -10.0, 0.0, 0.0),
        ];
        let shortage = detect_cigarette_shortage(&rows).unwrap();
        assert!((shortage.net_total - (-3.0)).abs() < 0.01);
        assert!((shortage.shortage_units() - 3.0).abs() < 0.01);
        let codes: Vec<_> = shortage.lines.iter().map(|l| l.product_code.as_str()).collect();
        assert_eq!(codes, vec!["M1", "T1", "M2"]);
    }

    #[test]
    fn no_tobacco_rows() {
        assert!(detect_cigarette_shortage(&[]).is_none());
    }
}
