//! Shrink detectors.
//!
//! Each detector is an independent, stateless pass over a store's rows:
//! filter by a predicate over the quantity columns, project a typed finding,
//! drop repeated product codes, sort. They never fail; an empty slice yields
//! no findings.

pub mod cash_register;
pub mod chronic;
pub mod cigarette;
pub mod external_theft;
pub mod family;
pub mod fire_manipulation;
pub mod internal_theft;

use std::collections::HashSet;

use shrink_ledger::text::fold_turkish;
use shrink_ledger::LedgerRow;

pub use cash_register::{check_cash_register_products, CashRegisterLine, CashRegisterReport};
pub use chronic::{detect_chronic_fire, detect_chronic_shortage, ChronicFire, ChronicShortage};
pub use cigarette::{detect_cigarette_shortage, CigaretteLine, CigaretteShortage};
pub use external_theft::{detect_external_theft, ExternalTheft};
pub use family::{detect_product_families, FamilyRisk, FamilyVerdict, ProductFamily};
pub use fire_manipulation::{detect_fire_manipulation, FireManipulation};
pub use internal_theft::{detect_internal_theft, InternalTheft, InternalTheftRisk};

/// Group-name tokens that mark tobacco products.
const CIGARETTE_TOKENS: [&str; 2] = ["SIGARA", "TUTUN"];

/// Whether the row's product group or main group names a tobacco category.
pub fn is_cigarette(row: &LedgerRow) -> bool {
    [&row.product_group, &row.main_group].iter().any(|group| {
        let folded = fold_turkish(group);
        CIGARETTE_TOKENS.iter().any(|token| folded.contains(token))
    })
}

/// Keep the first finding per product code.
pub(crate) fn dedup_by_code<T>(findings: Vec<T>, code: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    findings
        .into_iter()
        .filter(|f| seen.insert(code(f).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cigarette_groups_match_with_or_without_diacritics() {
        let row = |group: &str, main: &str| LedgerRow {
            product_group: group.into(),
            main_group: main.into(),
            ..Default::default()
        };
        assert!(is_cigarette(&row("Sigara", "")));
        assert!(is_cigarette(&row("", "TÜTÜN ÜRÜNLERİ")));
        assert!(is_cigarette(&row("ithal sigara", "")));
        assert!(!is_cigarette(&row("İÇECEK", "GIDA")));
    }

    #[test]
    fn dedup_keeps_first() {
        let items = vec![("A", 1), ("B", 2), ("A", 3)];
        let kept = dedup_by_code(items, |i| i.0);
        assert_eq!(kept, vec![("A", 1), ("B", 2)]);
    }
}
