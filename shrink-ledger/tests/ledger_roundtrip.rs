//! Upload a spreadsheet export, store it, and read it back in canonical form.

use shrink_ledger::filter::{available_periods, filter_rows, store_list};
use shrink_ledger::{load_ledger, Column, LedgerStore, Scope};

const EXPORT_CSV: &str = "\
Mağaza Kodu;Mağaza Tanım;Satış Müdürü;Envanter Dönemi;Depolama Koşulu Grubu;Malzeme Kodu;Malzeme Tanımı;Mal Grubu Tanımı;Fark Miktarı;Fark Tutarı;Satış Fiyatı;Envanter Tarihi
1001;KADIKOY;AYSE;202502;KURU;A1;MARLBORO TOUCH BLUE;SIGARA;-3;-285;95;14.02.2025
1001;KADIKOY;AYSE;202502;KURU;A2;KOLA 1 LT;ICECEK;-2,5;-62,5;25;14.02.2025
1002;MODA;MEHMET;202501;KURU;B1;EKMEK;FIRIN;1;12;12;20.01.2025
";

#[test]
fn export_survives_the_store() {
    let upload = load_ledger(EXPORT_CSV.as_bytes()).unwrap();
    assert_eq!(upload.len(), 3);
    assert!(upload.has(Column::UnitPrice));

    let path = std::env::temp_dir().join(format!("shrink-ledger-it-{}.csv", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let store = LedgerStore::open(&path).unwrap();

    let outcome = store.insert(&upload).unwrap();
    assert_eq!(outcome.inserted, 3);
    assert_eq!(outcome.skipped, 0);

    let again = store.insert(&upload).unwrap();
    assert_eq!(again.inserted, 0);
    assert_eq!(again.skipped, 2);

    let rows = store.rows().unwrap();
    assert_eq!(rows.len(), 3);
    let a2 = rows.iter().find(|r| r.product_code == "A2").unwrap();
    assert!((a2.diff_qty - (-2.5)).abs() < 0.01);
    assert_eq!(a2.product_group, "ICECEK");
    assert_eq!(a2.inventory_date, chrono::NaiveDate::from_ymd_opt(2025, 2, 14));

    assert_eq!(available_periods(&rows), vec!["202502", "202501"]);
    assert_eq!(store_list(&rows).len(), 2);

    let scope = Scope { sales_manager: Some("AYSE".into()), ..Default::default() };
    assert_eq!(filter_rows(&rows, &scope).len(), 2);

    let _ = std::fs::remove_file(&path);
}
