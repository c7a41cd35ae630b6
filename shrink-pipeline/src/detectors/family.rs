//! Product families.
//!
//! Variants of one product (same leading words, same brand, same group,
//! similar pack size) are often scanned under each other's codes. A family
//! whose diffs cancel out is a code mix-up, not a loss.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use shrink_ledger::text::{extract_quantity, first_two_words, is_quantity_similar, last_word, Quantity};
use shrink_ledger::LedgerRow;

/// Family total within which shortages and surpluses count as a mix-up.
const MIX_UP_TOLERANCE: f64 = 2.0;
/// Members listed in the family summary.
const SUMMARY_MEMBERS: usize = 5;
/// Characters of each member name shown in the summary.
const SUMMARY_NAME_CHARS: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FamilyVerdict {
    /// Diffs net out across the family.
    CodeMixUp,
    NetShortage,
    Surplus,
}

impl fmt::Display for FamilyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyVerdict::CodeMixUp => write!(f, "KOD KARIŞIKLIĞI - HIRSIZLIK DEĞİL"),
            FamilyVerdict::NetShortage => write!(f, "AİLEDE NET AÇIK VAR"),
            FamilyVerdict::Surplus => write!(f, "AİLEDE FAZLA VAR"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FamilyRisk {
    Low,
    Medium,
}

impl fmt::Display for FamilyRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyRisk::Low => write!(f, "DÜŞÜK"),
            FamilyRisk::Medium => write!(f, "ORTA"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductFamily {
    pub product_group: String,
    pub first_words: String,
    pub brand: String,
    pub member_count: usize,
    pub total_diff: f64,
    pub total_partial: f64,
    pub total_prior: f64,
    pub family_total: f64,
    pub verdict: FamilyVerdict,
    pub risk: FamilyRisk,
    pub member_codes: Vec<String>,
    /// `name(diff)` of the first members, joined by ` | `.
    pub summary: String,
}

struct Keyed<'a> {
    row: &'a LedgerRow,
    first_words: String,
    brand: String,
    quantity: Option<Quantity>,
}

pub fn detect_product_families(rows: &[LedgerRow]) -> Vec<ProductFamily> {
    let keyed: Vec<Keyed> = rows
        .iter()
        .map(|row| Keyed {
            row,
            first_words: first_two_words(&row.product_name),
            brand: last_word(&row.product_name),
            quantity: extract_quantity(&row.product_name),
        })
        .collect();

    let mut assigned: HashSet<usize> = HashSet::new();
    let mut families = Vec::new();

    for (seed_idx, seed) in keyed.iter().enumerate() {
        if assigned.contains(&seed_idx) || seed.first_words.is_empty() || seed.brand.is_empty() {
            continue;
        }

        let candidates: Vec<usize> = keyed
            .iter()
            .enumerate()
            .filter(|(_, k)| {
                k.first_words == seed.first_words
                    && k.brand == seed.brand
                    && k.row.product_group == seed.row.product_group
            })
            .map(|(i, _)| i)
            .collect();
        if candidates.len() <= 1 {
            continue;
        }

        let members: Vec<usize> = candidates
            .into_iter()
            .filter(|&i| is_quantity_similar(seed.quantity, keyed[i].quantity))
            .collect();
        assigned.extend(members.iter().copied());
        if members.len() <= 1 {
            continue;
        }

        let member_rows: Vec<&LedgerRow> = members.iter().map(|&i| keyed[i].row).collect();
        if member_rows.iter().map(|r| r.diff_qty.abs()).sum::<f64>() <= 0.0 {
            continue;
        }

        let total_diff: f64 = member_rows.iter().map(|r| r.diff_qty).sum();
        let total_partial: f64 = member_rows.iter().map(|r| r.partial_qty).sum();
        let total_prior: f64 = member_rows.iter().map(|r| r.prior_diff_qty).sum();
        let family_total = total_diff + total_partial + total_prior;

        let (verdict, risk) = if family_total.abs() <= MIX_UP_TOLERANCE {
            (FamilyVerdict::CodeMixUp, FamilyRisk::Low)
        } else if family_total < -MIX_UP_TOLERANCE {
            (FamilyVerdict::NetShortage, FamilyRisk::Medium)
        } else {
            (FamilyVerdict::Surplus, FamilyRisk::Low)
        };

        let summary = member_rows
            .iter()
            .take(SUMMARY_MEMBERS)
            .map(|r| {
                let name: String = r.product_name.chars().take(SUMMARY_NAME_CHARS).collect();
                format!("{}({:.1})", name, r.diff_qty)
            })
            .collect::<Vec<_>>()
            .join(" | ");

        families.push(ProductFamily {
            product_group: seed.row.product_group.clone(),
            first_words: seed.first_words.clone(),
            brand: seed.brand.clone(),
            member_count: member_rows.len(),
            total_diff,
            total_partial,
            total_prior,
            family_total,
            verdict,
            risk,
            member_codes: member_rows.iter().map(|r| r.product_code.clone()).collect(),
            summary,
        });
    }

    families.sort_by(|a, b| a.family_total.total_cmp(&b.family_total));
    families
}
