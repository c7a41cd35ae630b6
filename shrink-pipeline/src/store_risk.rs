//! Single-store risk score.
//!
//! A fixed checklist over the store's open ratio and the detector findings.
//! The level is taken from the uncapped score; the reported score is capped.

use serde::Serialize;
use shrink_ledger::LedgerRow;

use crate::detectors::{ChronicShortage, CigaretteShortage, InternalTheft, InternalTheftRisk};
use crate::types::RiskLevel;

/// Open amount over sales, in percent.
const HIGH_OPEN_RATIO: f64 = 2.0;
const MEDIUM_OPEN_RATIO: f64 = 1.0;
/// Absolute chronic shortage amount.
const HIGH_CHRONIC_AMOUNT: f64 = 5000.0;
const MEDIUM_CHRONIC_AMOUNT: f64 = 2000.0;
/// Cigarette shortage in units.
const HIGH_CIGARETTE_UNITS: f64 = 5.0;
const MAX_SCORE: u32 = 100;

#[derive(Clone, Debug, Serialize)]
pub struct StoreRisk {
    pub score: u32,
    pub level: RiskLevel,
    pub reasons: Vec<String>,
    /// Open amount as a percentage of sales.
    pub open_ratio: f64,
}

fn level_for(score: u32) -> RiskLevel {
    match score {
        s if s >= 60 => RiskLevel::Critical,
        s if s >= 40 => RiskLevel::Risky,
        s if s >= 20 => RiskLevel::Attention,
        _ => RiskLevel::Clean,
    }
}

pub fn calculate_store_risk(
    rows: &[LedgerRow],
    internal: &[InternalTheft],
    chronic: &[ChronicShortage],
    cigarette: Option<&CigaretteShortage>,
) -> StoreRisk {
    let mut score = 0u32;
    let mut reasons = Vec::new();

    let diff: f64 = rows.iter().map(|r| r.diff_amount).sum();
    let partial: f64 = rows.iter().map(|r| r.partial_amount).sum();
    let fire: f64 = rows.iter().map(|r| r.fire_amount).sum();
    let sales: f64 = rows.iter().map(|r| r.sales_amount).sum();
    let open = (diff + partial + fire).abs();
    let open_ratio = open / sales.max(1.0) * 100.0;

    if open_ratio > HIGH_OPEN_RATIO {
        score += 30;
        reasons.push(format!("High open ratio: %{:.1}", open_ratio));
    } else if open_ratio > MEDIUM_OPEN_RATIO {
        score += 15;
    }

    let very_high = internal
        .iter()
        .filter(|f| f.risk == InternalTheftRisk::VeryHigh)
        .count();
    if very_high > 0 {
        score += 25;
        reasons.push(format!("Internal theft suspicion on {} products", very_high));
    } else if internal.iter().any(|f| f.risk == InternalTheftRisk::High) {
        score += 15;
    }

    let chronic_amount: f64 = chronic.iter().map(|f| f.total_amount).sum();
    if chronic_amount.abs() > HIGH_CHRONIC_AMOUNT {
        score += 20;
        reasons.push(format!("Chronic shortage: {:.0} TL", chronic_amount));
    } else if chronic_amount.abs() > MEDIUM_CHRONIC_AMOUNT {
        score += 10;
    }

    if let Some(shortage) = cigarette {
        let units = shortage.shortage_units();
        if units > HIGH_CIGARETTE_UNITS {
            score += 25;
            reasons.push(format!("Cigarette shortage: {:.0} units", units));
        } else if units > 0.0 {
            score += 15;
        }
    }

    StoreRisk {
        score: score.min(MAX_SCORE),
        level: level_for(score),
        reasons,
        open_ratio,
    }
}
