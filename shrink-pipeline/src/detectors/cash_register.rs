//! Cash-register products.
//!
//! Low-price items sold at the till. A net surplus on them means sales were
//! rung up under these codes instead of the real products.

use std::collections::HashSet;

use serde::Serialize;
use shrink_ledger::cancellations::clean_code;
use shrink_ledger::{approx_zero, LedgerRow};

#[derive(Clone, Debug, Serialize)]
pub struct CashRegisterLine {
    pub product_code: String,
    pub product_name: String,
    pub diff_qty: f64,
    pub partial_qty: f64,
    /// Diff plus partial quantity.
    pub net_qty: f64,
    pub net_amount: f64,
}

impl CashRegisterLine {
    pub fn is_surplus(&self) -> bool {
        self.net_qty > 0.0
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CashRegisterReport {
    /// Lines that do not net to zero, largest surplus amount first.
    pub lines: Vec<CashRegisterLine>,
    /// Net quantity over every cash-register row of the store.
    pub total_qty: f64,
    pub total_amount: f64,
    pub problem_count: usize,
}

pub fn check_cash_register_products(rows: &[LedgerRow], codes: &HashSet<String>) -> CashRegisterReport {
    if codes.is_empty() {
        return CashRegisterReport::default();
    }

    let all: Vec<CashRegisterLine> = rows
        .iter()
        .filter(|r| codes.contains(&clean_code(&r.product_code)))
        .map(|r| CashRegisterLine {
            product_code: r.product_code.clone(),
            product_name: r.product_name.clone(),
            diff_qty: r.diff_qty,
            partial_qty: r.partial_qty,
            net_qty: r.diff_qty + r.partial_qty,
            net_amount: r.diff_amount + r.partial_amount,
        })
        .collect();

    let total_qty = all.iter().map(|l| l.net_qty).sum();
    let total_amount = all.iter().map(|l| l.net_amount).sum();

    let mut lines: Vec<CashRegisterLine> = all.into_iter().filter(|l| !approx_zero(l.net_qty)).collect();
    lines.sort_by(|a, b| b.net_amount.total_cmp(&a.net_amount));

    CashRegisterReport {
        problem_count: lines.len(),
        lines,
        total_qty,
        total_amount,
    }
}
