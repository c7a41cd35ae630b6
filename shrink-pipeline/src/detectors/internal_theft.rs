//! Internal theft suspicion.
//!
//! A high-price product whose unexplained shortage matches the cancelled
//! sale lines rung up at the till. The closer the match, the higher the risk.

use std::fmt;

use serde::Serialize;
use shrink_ledger::{approx_zero, LedgerRow};

use super::dedup_by_code;

/// Minimum unit price for a product to be considered.
pub const MIN_UNIT_PRICE: f64 = 100.0;
/// Gap up to which a match counts as close.
const HIGH_GAP: f64 = 2.0;
const MEDIUM_GAP: f64 = 5.0;
/// Gap beyond which the shortage is not attributed to cancellations.
const MAX_GAP: f64 = 10.0;

/// Ordered from most to least suspicious.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum InternalTheftRisk {
    VeryHigh,
    High,
    Medium,
    LowMedium,
}

impl fmt::Display for InternalTheftRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalTheftRisk::VeryHigh => write!(f, "ÇOK YÜKSEK"),
            InternalTheftRisk::High => write!(f, "YÜKSEK"),
            InternalTheftRisk::Medium => write!(f, "ORTA"),
            InternalTheftRisk::LowMedium => write!(f, "DÜŞÜK-ORTA"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct InternalTheft {
    pub product_code: String,
    pub product_name: String,
    pub product_group: String,
    pub unit_price: f64,
    pub diff_qty: f64,
    pub partial_qty: f64,
    pub prior_diff_qty: f64,
    pub total_qty: f64,
    pub cancelled_qty: f64,
    /// Distance between the shortage and the cancelled quantity.
    pub gap: f64,
    pub match_label: String,
    pub diff_amount: f64,
    pub risk: InternalTheftRisk,
    /// Camera-check hint, filled in when cancellation records are available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_check: Option<String>,
}

fn classify_gap(gap: f64) -> Option<(InternalTheftRisk, String)> {
    if approx_zero(gap) {
        Some((InternalTheftRisk::VeryHigh, "exact match".to_string()))
    } else if gap <= HIGH_GAP {
        Some((InternalTheftRisk::High, "close (±2)".to_string()))
    } else if gap <= MEDIUM_GAP {
        Some((InternalTheftRisk::Medium, "close (±5)".to_string()))
    } else if gap <= MAX_GAP {
        Some((InternalTheftRisk::LowMedium, format!("gap: {gap}")))
    } else {
        None
    }
}

pub fn detect_internal_theft(rows: &[LedgerRow]) -> Vec<InternalTheft> {
    let findings = rows
        .iter()
        .filter(|r| !r.is_balanced() && r.unit_price >= MIN_UNIT_PRICE)
        .filter_map(|r| {
            let total = r.total_qty();
            if total >= 0.0 || r.cancelled_qty <= 0.0 {
                return None;
            }
            let gap = (total.abs() - r.cancelled_qty).abs();
            let (risk, match_label) = classify_gap(gap)?;
            Some(InternalTheft {
                product_code: r.product_code.clone(),
                product_name: r.product_name.clone(),
                product_group: r.product_group.clone(),
                unit_price: r.unit_price,
                diff_qty: r.diff_qty,
                partial_qty: r.partial_qty,
                prior_diff_qty: r.prior_diff_qty,
                total_qty: total,
                cancelled_qty: r.cancelled_qty,
                gap,
                match_label,
                diff_amount: r.diff_amount,
                risk,
                camera_check: None,
            })
        })
        .collect();

    let mut findings = dedup_by_code(findings, |f: &InternalTheft| f.product_code.as_str());
    findings.sort_by(|a, b| {
        a.risk
            .cmp(&b.risk)
            .then_with(|| a.diff_amount.total_cmp(&b.diff_amount))
    });
    findings
}
