//! Region-wide aggregation: per-store metrics and signal counts, the
//! weighted store score, roll-ups by manager and the product-group summary.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use shrink_ledger::cancellations::clean_code;
use shrink_ledger::LedgerRow;

use crate::config::{BandHit, RiskConfig};
use crate::detectors::internal_theft::MIN_UNIT_PRICE;
use crate::detectors::{is_cigarette, CashRegisterReport};
use crate::types::{RiskLevel, StoreCandidate};
use crate::util::{format_thousands, ratio_pct};

/// Product-group totals below this amount get a comment.
const COMMENT_AMOUNT: f64 = -500.0;
/// Groups commented per category.
const COMMENT_GROUPS: usize = 3;

fn first_text<'a>(rows: &'a [LedgerRow], field: impl Fn(&'a LedgerRow) -> &'a str) -> String {
    rows.iter()
        .map(field)
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Metrics and signal counts of one store's rows.
pub fn store_metrics(store_code: &str, rows: &[LedgerRow], cash_codes: &HashSet<String>) -> StoreCandidate {
    let sales: f64 = rows.iter().map(|r| r.sales_amount).sum();
    let diff: f64 = rows.iter().map(|r| r.diff_amount + r.partial_amount).sum();
    let fire: f64 = rows.iter().map(|r| r.fire_amount).sum();
    let total_loss = diff + fire;

    let end = rows.iter().find_map(|r| r.inventory_date);
    let start = rows.iter().find_map(|r| r.inventory_start_date);
    let days = match (end, start) {
        (Some(end), Some(start)) => (end - start).num_days().max(1),
        _ => 1,
    };

    let internal_theft_count = rows
        .iter()
        .filter(|r| r.unit_price >= MIN_UNIT_PRICE && r.diff_qty < 0.0)
        .count();
    let chronic_count = rows
        .iter()
        .filter(|r| r.prior_diff_qty < 0.0 && r.diff_qty < 0.0)
        .count();
    let chronic_fire_count = rows
        .iter()
        .filter(|r| r.prior_fire_qty < 0.0 && r.fire_qty < 0.0)
        .count();
    let cigarette_net: f64 = rows
        .iter()
        .filter(|r| is_cigarette(r))
        .map(|r| r.total_qty())
        .sum();
    let fire_manipulation_count = rows
        .iter()
        .filter(|r| r.fire_qty.abs() > (r.diff_qty + r.partial_qty).abs())
        .count();

    let cash_rows = rows
        .iter()
        .filter(|r| !cash_codes.is_empty() && cash_codes.contains(&clean_code(&r.product_code)));
    let (cash_qty, cash_amount) = cash_rows.fold((0.0, 0.0), |(qty, amount), r| {
        (qty + r.diff_qty + r.partial_qty, amount + r.diff_amount + r.partial_amount)
    });

    StoreCandidate {
        store_code: store_code.to_string(),
        store_name: first_text(rows, |r| r.store_name.as_str()),
        sales_manager: first_text(rows, |r| r.sales_manager.as_str()),
        region_manager: first_text(rows, |r| r.region_manager.as_str()),
        sales,
        diff,
        fire,
        total_loss,
        diff_pct: ratio_pct(diff, sales),
        fire_pct: ratio_pct(fire, sales),
        total_pct: ratio_pct(total_loss, sales),
        days,
        daily_diff: diff / days as f64,
        daily_fire: fire / days as f64,
        internal_theft_count,
        chronic_count,
        chronic_fire_count,
        cigarette_shortage: (-cigarette_net).max(0.0),
        fire_manipulation_count,
        cash_qty,
        cash_amount,
        ..Default::default()
    }
}

/// Weighted score of a store against the configured bands.
///
/// Returns the capped score, its level and the reasons for the headline
/// signals.
pub fn score_store(store: &StoreCandidate, config: &RiskConfig) -> (u32, RiskLevel, Vec<String>) {
    let weights = &config.risk_weights;
    let mut score = 0u32;
    let mut reasons = Vec::new();

    if let Some((hit, points)) = weights.total_ratio.evaluate(store.total_pct) {
        score += points;
        if hit == BandHit::High {
            reasons.push(format!("Total %{:.1}", store.total_pct));
        }
    }
    if let Some((hit, points)) = weights.internal_theft.evaluate(store.internal_theft_count as f64) {
        score += points;
        if hit == BandHit::High {
            reasons.push(format!("Internal theft {}", store.internal_theft_count));
        }
    }
    if let Some((hit, points)) = weights.cigarette.evaluate(store.cigarette_shortage) {
        score += points;
        if hit == BandHit::High {
            reasons.push(format!("CIGARETTE {:.0}", store.cigarette_shortage));
        }
    }
    if let Some((_, points)) = weights.chronic.evaluate(store.chronic_count as f64) {
        score += points;
    }
    if let Some((_, points)) = weights
        .fire_manipulation
        .evaluate(store.fire_manipulation_count as f64)
    {
        score += points;
    }
    if let Some((_, points)) = weights.cash_register.evaluate(store.cash_qty) {
        score += points;
    }

    let score = score.min(config.max_risk_score);
    (score, config.risk_levels.classify(score), reasons)
}

/// Which manager the region roll-up groups by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GroupBy {
    SalesManager,
    RegionManager,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct GroupSummary {
    pub manager: String,
    pub store_count: usize,
    pub sales: f64,
    pub diff: f64,
    pub fire: f64,
    pub total_loss: f64,
    pub internal_theft_count: usize,
    pub chronic_count: usize,
    pub cigarette_shortage: f64,
    pub cash_qty: f64,
    pub cash_amount: f64,
    pub mean_risk_score: f64,
    pub diff_pct: f64,
    pub fire_pct: f64,
    pub total_pct: f64,
}

/// Roll scored stores up by manager, highest mean score first.
pub fn aggregate_by_group(stores: &[StoreCandidate], by: GroupBy) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<&str, Vec<&StoreCandidate>> = BTreeMap::new();
    for store in stores {
        let key = match by {
            GroupBy::SalesManager => store.sales_manager.as_str(),
            GroupBy::RegionManager => store.region_manager.as_str(),
        };
        groups.entry(key).or_default().push(store);
    }

    let mut summaries: Vec<GroupSummary> = groups
        .into_iter()
        .map(|(manager, members)| {
            let codes: HashSet<&str> = members.iter().map(|s| s.store_code.as_str()).collect();
            let sales: f64 = members.iter().map(|s| s.sales).sum();
            let diff: f64 = members.iter().map(|s| s.diff).sum();
            let fire: f64 = members.iter().map(|s| s.fire).sum();
            let total_loss: f64 = members.iter().map(|s| s.total_loss).sum();
            let score_sum: f64 = members
                .iter()
                .map(|s| s.risk_score.unwrap_or(0) as f64)
                .sum();
            GroupSummary {
                manager: manager.to_string(),
                store_count: codes.len(),
                sales,
                diff,
                fire,
                total_loss,
                internal_theft_count: members.iter().map(|s| s.internal_theft_count).sum(),
                chronic_count: members.iter().map(|s| s.chronic_count).sum(),
                cigarette_shortage: members.iter().map(|s| s.cigarette_shortage).sum(),
                cash_qty: members.iter().map(|s| s.cash_qty).sum(),
                cash_amount: members.iter().map(|s| s.cash_amount).sum(),
                mean_risk_score: score_sum / members.len() as f64,
                diff_pct: ratio_pct(diff, sales),
                fire_pct: ratio_pct(fire, sales),
                total_pct: ratio_pct(total_loss, sales),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.mean_risk_score.total_cmp(&a.mean_risk_score));
    summaries
}

/// Totals of one product group.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProductGroupStat {
    pub product_group: String,
    /// Diff plus partial plus prior diff amount.
    pub total_diff: f64,
    pub total_fire: f64,
    pub total_sales: f64,
    /// Rows with a negative diff quantity.
    pub shortage_count: usize,
    pub open_ratio: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ExecutiveSummary {
    pub comments: Vec<String>,
    pub group_stats: Vec<ProductGroupStat>,
}

/// Product-group totals and headline comments for a store or region.
pub fn executive_summary(rows: &[LedgerRow], cash: Option<&CashRegisterReport>) -> ExecutiveSummary {
    let mut groups: BTreeMap<&str, ProductGroupStat> = BTreeMap::new();
    for row in rows {
        let stat = groups
            .entry(row.product_group.as_str())
            .or_insert_with(|| ProductGroupStat {
                product_group: row.product_group.clone(),
                ..Default::default()
            });
        stat.total_diff += row.diff_amount + row.partial_amount + row.prior_diff_amount;
        stat.total_fire += row.fire_amount;
        stat.total_sales += row.sales_amount;
        if row.diff_qty < 0.0 {
            stat.shortage_count += 1;
        }
    }
    let group_stats: Vec<ProductGroupStat> = groups
        .into_values()
        .map(|mut stat| {
            stat.open_ratio = ratio_pct(stat.total_diff, stat.total_sales);
            stat
        })
        .collect();

    let mut comments = Vec::new();

    let mut by_diff: Vec<&ProductGroupStat> = group_stats.iter().collect();
    by_diff.sort_by(|a, b| a.total_diff.total_cmp(&b.total_diff));
    for stat in by_diff
        .iter()
        .take(COMMENT_GROUPS)
        .filter(|s| s.total_diff < COMMENT_AMOUNT)
    {
        comments.push(format!(
            "{}: {} TL shortage ({} products)",
            stat.product_group,
            format_thousands(stat.total_diff),
            stat.shortage_count
        ));
    }

    let mut by_fire: Vec<&ProductGroupStat> = group_stats.iter().collect();
    by_fire.sort_by(|a, b| a.total_fire.total_cmp(&b.total_fire));
    for stat in by_fire
        .iter()
        .take(COMMENT_GROUPS)
        .filter(|s| s.total_fire < COMMENT_AMOUNT)
    {
        comments.push(format!(
            "{}: {} TL fire",
            stat.product_group,
            format_thousands(stat.total_fire)
        ));
    }

    if let Some(cash) = cash {
        if cash.total_qty > 0.0 {
            comments.push(format!(
                "CASH-REGISTER PRODUCTS: NET +{:.0} units / {} TL SURPLUS",
                cash.total_qty,
                format_thousands(cash.total_amount)
            ));
        } else if cash.total_qty < 0.0 {
            comments.push(format!(
                "CASH-REGISTER PRODUCTS: NET {:.0} units / {} TL SHORTAGE",
                cash.total_qty,
                format_thousands(cash.total_amount)
            ));
        }
    }

    ExecutiveSummary {
        comments,
        group_stats,
    }
}
