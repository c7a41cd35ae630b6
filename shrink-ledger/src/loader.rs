//! CSV ledger loader.
//!
//! Reads inventory exports with any of the accepted header spellings into
//! canonical [`LedgerRow`]s. Missing numeric columns read as zero.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};
use crate::row::LedgerRow;
use crate::schema::Column;

/// Columns that identify one product line of one count.
const DEDUP_KEY: [Column; 4] = [
    Column::StoreCode,
    Column::Period,
    Column::StorageGroup,
    Column::ProductCode,
];

/// Loaded rows plus the canonical columns the source actually carried.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub rows: Vec<LedgerRow>,
    pub columns: HashSet<Column>,
}

impl Ledger {
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pick `;` when the header line has more semicolons than commas.
fn detect_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Load a ledger from a CSV reader.
pub fn load_ledger<R: Read>(mut reader: R) -> LedgerResult<Ledger> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let content = content.trim_start_matches('\u{feff}');

    let header_line = content.lines().next().unwrap_or_default();
    if header_line.trim().is_empty() {
        return Err(LedgerError::EmptyHeader);
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(detect_delimiter(header_line))
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut columns = HashSet::new();
    let mapping: Vec<Option<Column>> = csv_reader
        .headers()?
        .iter()
        .map(|header| {
            // First header wins when two spellings of one column are present.
            Column::from_header(header).filter(|column| columns.insert(*column))
        })
        .collect();

    let derive_net_impact = !columns.contains(&Column::NetImpactAmount);

    let mut rows = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|source| LedgerError::Parse {
            line: source
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2),
            source,
        })?;

        let mut row = LedgerRow::default();
        for (cell, column) in record.iter().zip(&mapping) {
            if let Some(column) = column {
                row.set_cell(*column, cell);
            }
        }
        if derive_net_impact {
            row.net_impact_amount = row.diff_amount + row.fire_amount + row.partial_amount;
        }
        rows.push(row);
    }

    let before = rows.len();
    let rows = dedup_latest(rows, &columns);
    if rows.len() < before {
        log::info!(
            "Dropped {} duplicate ledger rows ({} remain)",
            before - rows.len(),
            rows.len()
        );
    }

    Ok(Ledger { rows, columns })
}

/// Load a ledger from a CSV file path.
pub fn load_ledger_file(path: impl AsRef<Path>) -> LedgerResult<Ledger> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| LedgerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_ledger(file)
}

/// Order by inventory date, newest first (undated rows last), and keep the
/// first row per key over the key columns the source carried.
fn dedup_latest(mut rows: Vec<LedgerRow>, columns: &HashSet<Column>) -> Vec<LedgerRow> {
    let key_columns: Vec<Column> = DEDUP_KEY
        .iter()
        .copied()
        .filter(|c| columns.contains(c))
        .collect();
    if key_columns.is_empty() {
        return rows;
    }

    rows.sort_by(|a, b| match (a.inventory_date, b.inventory_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let key = key_columns
                .iter()
                .map(|c| row.text(*c).unwrap_or_default().to_string())
                .collect();
            seen.insert(key)
        })
        .collect()
}

/// Group rows by store code, ordered by code.
pub fn group_by_store(rows: &[LedgerRow]) -> Vec<(String, Vec<LedgerRow>)> {
    let mut groups: BTreeMap<String, Vec<LedgerRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.store_code.clone())
            .or_default()
            .push(row.clone());
    }
    groups.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE_CSV: &str = "\
Mağaza Kodu,Mağaza Tanım,Envanter Dönemi,Depolama Koşulu Grubu,Malzeme Kodu,Malzeme Tanımı,Fark Miktarı,Fark Tutarı,Fire Tutarı,Kısmi Envanter Tutarı,Envanter Tarihi
1001,KADIKOY,202501,KURU,A1,COLA 1 LT,-4,-120,-10,5,2025-01-20
1001,KADIKOY,202501,KURU,A2,SU 500 ML,2,10,0,0,2025-01-20
1002,MODA,202501,KURU,B1,EKMEK,-1,-15,,,2025-01-21
";

    #[test]
    fn load_sample_csv() {
        let ledger = load_ledger(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 3);
        assert!(ledger.has(Column::StoreCode));
        assert!(!ledger.has(Column::CancelledQty));

        let a1 = ledger.rows.iter().find(|r| r.product_code == "A1").unwrap();
        assert_eq!(a1.store_name, "KADIKOY");
        assert!((a1.diff_qty - (-4.0)).abs() < 0.01);
        assert_eq!(a1.cancelled_qty, 0.0);
        // Net impact derived as diff + fire + partial amounts.
        assert!((a1.net_impact_amount - (-125.0)).abs() < 0.01);
    }

    #[test]
    fn semicolon_delimiter_and_comma_decimals() {
        let csv_data = "\
magaza_kodu;malzeme_kodu;fark_miktari;satis_fiyati
1001;A1;-2,5;149,90
";
        let ledger = load_ledger(csv_data.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 1);
        assert!((ledger.rows[0].diff_qty - (-2.5)).abs() < 0.01);
        assert!((ledger.rows[0].unit_price - 149.9).abs() < 0.01);
    }

    #[test]
    fn dedup_keeps_newest_row_per_key() {
        let csv_data = "\
Mağaza Kodu,Envanter Dönemi,Depolama Koşulu Grubu,Malzeme Kodu,Fark Miktarı,Envanter Tarihi
1001,202501,KURU,A1,-1,2025-01-10
1001,202501,KURU,A1,-7,2025-01-20
1001,202501,KURU,A1,-9,
1001,202501,SOGUK,A1,-3,2025-01-15
";
        let ledger = load_ledger(csv_data.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 2);
        let kuru = ledger.rows.iter().find(|r| r.storage_group == "KURU").unwrap();
        assert!((kuru.diff_qty - (-7.0)).abs() < 0.01);
        assert_eq!(kuru.inventory_date, NaiveDate::from_ymd_opt(2025, 1, 20));
    }

    #[test]
    fn no_key_columns_means_no_dedup() {
        let csv_data = "Fark Miktarı,Fark Tutarı\n-1,-10\n-1,-10\n";
        let ledger = load_ledger(csv_data.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = load_ledger("".as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyHeader));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_ledger_file("/nonexistent/ledger.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ledger.csv"));
    }

    #[test]
    fn group_rows_by_store() {
        let ledger = load_ledger(SAMPLE_CSV.as_bytes()).unwrap();
        let groups = group_by_store(&ledger.rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "1001");
        assert_eq!(groups[0].1.len(), 2);
    }
}
