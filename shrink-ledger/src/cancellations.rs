//! Cancelled sale-line export loader.
//!
//! The till system exports one row per cancelled line. Headers are matched by
//! name; exports that lost their header names fall back to fixed column
//! positions.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::schema::{parse_date, parse_number};

/// One cancelled sale line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CancellationRecord {
    pub store_code: String,
    pub product_code: String,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub quantity: f64,
    pub transaction_no: String,
    pub till_no: String,
}

/// Trim a code and strip one trailing `.0` left behind by float-typed cells.
pub fn clean_code(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

struct FieldSpec {
    header: &'static str,
    fallback: Option<usize>,
}

const STORE: FieldSpec = FieldSpec { header: "Mağaza - Anahtar", fallback: Some(7) };
const PRODUCT: FieldSpec = FieldSpec { header: "Malzeme - Anahtar", fallback: Some(17) };
const DATE: FieldSpec = FieldSpec { header: "Tarih - Anahtar", fallback: Some(3) };
const TIME: FieldSpec = FieldSpec { header: "Fiş Saati", fallback: Some(31) };
const QUANTITY: FieldSpec = FieldSpec { header: "Miktar", fallback: None };
const TRANSACTION: FieldSpec = FieldSpec { header: "İşlem Numarası", fallback: Some(36) };
const TILL: FieldSpec = FieldSpec { header: "Kasa numarası", fallback: Some(20) };

fn resolve(headers: &csv::StringRecord, spec: &FieldSpec) -> Option<usize> {
    headers
        .iter()
        .position(|h| h == spec.header)
        .or_else(|| spec.fallback.filter(|&i| i < headers.len()))
}

/// Load cancellation records from a CSV reader.
pub fn load_cancellations<R: Read>(reader: R) -> LedgerResult<Vec<CancellationRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LedgerError::EmptyHeader);
    }
    let store = resolve(&headers, &STORE);
    let product = resolve(&headers, &PRODUCT);
    let date = resolve(&headers, &DATE);
    let time = resolve(&headers, &TIME);
    let quantity = resolve(&headers, &QUANTITY);
    let transaction = resolve(&headers, &TRANSACTION);
    let till = resolve(&headers, &TILL);

    let mut records = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|source| LedgerError::Parse {
            line: index as u64 + 2,
            source,
        })?;
        let cell = |i: Option<usize>| i.and_then(|i| record.get(i)).unwrap_or_default();

        records.push(CancellationRecord {
            store_code: clean_code(cell(store)),
            product_code: clean_code(cell(product)),
            date: parse_date(cell(date)),
            time: cell(time).chars().take(8).collect(),
            quantity: parse_number(cell(quantity)),
            transaction_no: cell(transaction).to_string(),
            till_no: clean_code(cell(till)),
        });
    }

    log::info!("Loaded {} cancellation records", records.len());
    Ok(records)
}

pub fn load_cancellations_file(path: impl AsRef<Path>) -> LedgerResult<Vec<CancellationRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| LedgerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_cancellations(file)
}

/// One store's cancellations, keyed by product code.
#[derive(Debug, Clone, Default)]
pub struct CancellationIndex {
    by_product: HashMap<String, Vec<CancellationRecord>>,
}

impl CancellationIndex {
    /// Index the records of `store_code` whose product is one of `codes`.
    pub fn for_store<'a>(
        records: &[CancellationRecord],
        store_code: &str,
        codes: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let store = clean_code(store_code);
        let wanted: HashSet<String> = codes.into_iter().map(clean_code).collect();

        let mut by_product: HashMap<String, Vec<CancellationRecord>> = HashMap::new();
        for record in records
            .iter()
            .filter(|r| r.store_code == store && wanted.contains(&r.product_code))
        {
            by_product
                .entry(record.product_code.clone())
                .or_default()
                .push(record.clone());
        }
        Self { by_product }
    }

    pub fn get(&self, product_code: &str) -> &[CancellationRecord] {
        self.by_product
            .get(&clean_code(product_code))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_product.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_code_strips_one_float_suffix() {
        assert_eq!(clean_code(" 1001.0 "), "1001");
        assert_eq!(clean_code("1001"), "1001");
        assert_eq!(clean_code("10.0.0"), "10.0");
    }

    #[test]
    fn named_headers_are_read() {
        let csv_data = "\
Tarih - Anahtar,Mağaza - Anahtar,Malzeme - Anahtar,Fiş Saati,Miktar,İşlem Numarası,Kasa numarası
10.01.2025,1001.0,A1,14:22:05.123,2,T-1,3.0
11.01.2025,1001,A2,09:00:00,1,T-2,
";
        let records = load_cancellations(csv_data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].store_code, "1001");
        assert_eq!(records[0].time, "14:22:05");
        assert_eq!(records[0].till_no, "3");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 1, 10));
        assert!((records[0].quantity - 2.0).abs() < 0.01);
        assert_eq!(records[1].till_no, "");
    }

    #[test]
    fn positional_fallback_for_renamed_headers() {
        let headers: Vec<String> = (0..40).map(|i| format!("c{i}")).collect();
        let mut cells = vec![String::new(); 40];
        cells[3] = "2025-01-12".into();
        cells[7] = "2002".into();
        cells[17] = "B9".into();
        cells[20] = "5".into();
        cells[31] = "18:30:00".into();
        cells[36] = "TX9".into();
        let csv_data = format!("{}\n{}\n", headers.join(","), cells.join(","));

        let records = load_cancellations(csv_data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.store_code, "2002");
        assert_eq!(r.product_code, "B9");
        assert_eq!(r.till_no, "5");
        assert_eq!(r.time, "18:30:00");
        assert_eq!(r.transaction_no, "TX9");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 1, 12));
        assert_eq!(r.quantity, 0.0);
    }

    #[test]
    fn index_filters_store_and_codes() {
        let records = vec![
            CancellationRecord { store_code: "1001".into(), product_code: "A1".into(), ..Default::default() },
            CancellationRecord { store_code: "1001".into(), product_code: "A1".into(), ..Default::default() },
            CancellationRecord { store_code: "1001".into(), product_code: "Z9".into(), ..Default::default() },
            CancellationRecord { store_code: "2002".into(), product_code: "A1".into(), ..Default::default() },
        ];
        let index = CancellationIndex::for_store(&records, "1001.0", ["A1", "B2"]);
        assert_eq!(index.get("A1").len(), 2);
        assert!(index.get("Z9").is_empty());
        assert!(index.get("B2").is_empty());
    }
}
