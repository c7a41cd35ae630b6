//! Scope filters over loaded rows.

use std::collections::{BTreeMap, BTreeSet};

use crate::row::LedgerRow;
use crate::schema::Column;

/// Which slice of the ledger an analysis looks at. Unset fields don't
/// constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub sales_manager: Option<String>,
    pub store_code: Option<String>,
    pub periods: Vec<String>,
}

impl Scope {
    pub fn matches(&self, row: &LedgerRow) -> bool {
        let manager_ok = match self.sales_manager.as_deref() {
            Some(m) if !m.is_empty() => row.sales_manager == m,
            _ => true,
        };
        let store_ok = match self.store_code.as_deref() {
            Some(s) if !s.is_empty() => row.store_code == s,
            _ => true,
        };
        let period_ok = self.periods.is_empty() || self.periods.iter().any(|p| *p == row.period);
        manager_ok && store_ok && period_ok
    }
}

pub fn filter_rows(rows: &[LedgerRow], scope: &Scope) -> Vec<LedgerRow> {
    rows.iter().filter(|r| scope.matches(r)).cloned().collect()
}

/// Distinct non-empty periods, newest first.
pub fn available_periods(rows: &[LedgerRow]) -> Vec<String> {
    let mut periods = unique_values(rows, Column::Period);
    periods.reverse();
    periods
}

/// Sorted distinct non-empty values of a text column.
pub fn unique_values(rows: &[LedgerRow], column: Column) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.text(column))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Store code to the first non-empty store name seen for it.
pub fn store_list(rows: &[LedgerRow]) -> BTreeMap<String, String> {
    let mut stores: BTreeMap<String, String> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.store_code.is_empty()) {
        let name = stores.entry(row.store_code.clone()).or_default();
        if name.is_empty() {
            *name = row.store_name.clone();
        }
    }
    stores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(store: &str, manager: &str, period: &str) -> LedgerRow {
        LedgerRow {
            store_code: store.into(),
            sales_manager: manager.into(),
            period: period.into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_scope_matches_everything() {
        let rows = vec![row("1", "AYSE", "202501"), row("2", "MEHMET", "202502")];
        assert_eq!(filter_rows(&rows, &Scope::default()).len(), 2);
    }

    #[test]
    fn scope_fields_combine() {
        let rows = vec![
            row("1", "AYSE", "202501"),
            row("1", "AYSE", "202502"),
            row("2", "MEHMET", "202502"),
        ];
        let scope = Scope {
            sales_manager: Some("AYSE".into()),
            periods: vec!["202502".into()],
            ..Default::default()
        };
        let kept = filter_rows(&rows, &scope);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].store_code, "1");

        let scope = Scope { store_code: Some(String::new()), ..Default::default() };
        assert_eq!(filter_rows(&rows, &scope).len(), 3);
    }

    #[test]
    fn periods_newest_first() {
        let rows = vec![row("1", "", "202501"), row("1", "", "202503"), row("2", "", ""), row("2", "", "202502")];
        assert_eq!(available_periods(&rows), vec!["202503", "202502", "202501"]);
    }

    #[test]
    fn store_list_takes_first_non_empty_name() {
        let mut a = row("1", "", "");
        let mut b = row("1", "", "");
        b.store_name = "KADIKOY".into();
        let mut c = row("1", "", "");
        c.store_name = "OTHER".into();
        a.store_name = String::new();
        let stores = store_list(&[a, b, c]);
        assert_eq!(stores.get("1").map(String::as_str), Some("KADIKOY"));
    }
}
