//! Local ledger store.
//!
//! One canonical CSV file holding every uploaded count. An upload is applied
//! per inventory (`store | period | storage group`): inventories already in
//! the store are skipped whole, new ones are appended.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, LedgerResult};
use crate::loader::{load_ledger_file, Ledger};
use crate::row::LedgerRow;
use crate::schema::Column;

/// Columns an upload must carry to be stored.
const REQUIRED: [Column; 4] = [
    Column::StoreCode,
    Column::StorageGroup,
    Column::Period,
    Column::ProductCode,
];

/// How many inventory keys the outcome message names.
const MESSAGE_KEYS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Rows appended to the store.
    pub inserted: usize,
    /// Inventories skipped because the store already had them.
    pub skipped: usize,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

fn inventory_key(row: &LedgerRow) -> String {
    format!("{}|{}|{}", row.store_code, row.period, row.storage_group)
}

fn describe_keys(keys: &[String]) -> String {
    let shown: Vec<String> = keys
        .iter()
        .take(MESSAGE_KEYS)
        .map(|k| k.replace('|', " / "))
        .collect();
    format!("{}...", shown.join(", "))
}

impl LedgerStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| LedgerError::Open {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn has_data(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    /// Every stored row, read back through the regular loader.
    pub fn rows(&self) -> LedgerResult<Vec<LedgerRow>> {
        if !self.has_data() {
            return Ok(Vec::new());
        }
        Ok(load_ledger_file(&self.path)?.rows)
    }

    /// Insert the upload's inventories that the store does not hold yet.
    pub fn insert(&self, ledger: &Ledger) -> LedgerResult<InsertOutcome> {
        if let Some(missing) = REQUIRED.iter().find(|c| !ledger.has(**c)) {
            return Err(LedgerError::MissingColumn(*missing));
        }

        let existing: HashSet<String> = self.rows()?.iter().map(inventory_key).collect();

        let mut upload_keys: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for row in &ledger.rows {
            let key = inventory_key(row);
            if seen.insert(key.clone()) {
                upload_keys.push(key);
            }
        }
        let (skipped, new_keys): (Vec<String>, Vec<String>) =
            upload_keys.into_iter().partition(|k| existing.contains(k));

        if new_keys.is_empty() {
            log::info!("All {} uploaded inventories already stored", skipped.len());
            return Ok(InsertOutcome {
                inserted: 0,
                skipped: skipped.len(),
                message: format!("All inventories already present: {}", describe_keys(&skipped)),
            });
        }

        let new_key_set: HashSet<&String> = new_keys.iter().collect();
        let mut product_keys = HashSet::new();
        let mut rows: Vec<&LedgerRow> = ledger
            .rows
            .iter()
            .rev()
            .filter(|r| new_key_set.contains(&inventory_key(r)))
            .filter(|r| product_keys.insert((inventory_key(r), r.product_code.clone())))
            .collect();
        rows.reverse();

        self.append(&rows)?;
        log::info!(
            "Stored {} rows for {} new inventories ({} skipped) in {}",
            rows.len(),
            new_keys.len(),
            skipped.len(),
            self.path.display()
        );

        Ok(InsertOutcome {
            inserted: rows.len(),
            skipped: skipped.len(),
            message: format!("Loaded: {}", describe_keys(&new_keys)),
        })
    }

    fn append(&self, rows: &[&LedgerRow]) -> LedgerResult<()> {
        let write_header = !self.has_data();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LedgerError::Open {
                path: self.path.clone(),
                source,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(store: &str, period: &str, group: &str, product: &str, diff: f64) -> LedgerRow {
        LedgerRow {
            store_code: store.into(),
            period: period.into(),
            storage_group: group.into(),
            product_code: product.into(),
            diff_qty: diff,
            ..Default::default()
        }
    }

    fn ledger(rows: Vec<LedgerRow>) -> Ledger {
        Ledger {
            rows,
            columns: REQUIRED.iter().copied().chain([Column::DiffQty]).collect(),
        }
    }

    #[test]
    fn describe_keys_caps_at_three() {
        let keys: Vec<String> = (1..=4).map(|i| format!("{i}|202501|KURU")).collect();
        assert_eq!(
            describe_keys(&keys),
            "1 / 202501 / KURU, 2 / 202501 / KURU, 3 / 202501 / KURU..."
        );
        assert_eq!(describe_keys(&keys[..1]), "1 / 202501 / KURU...");
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let store = LedgerStore::open(std::env::temp_dir().join("shrink-ledger-unused.csv")).unwrap();
        let upload = Ledger {
            rows: vec![row("1", "202501", "KURU", "A", 1.0)],
            columns: [Column::StoreCode, Column::Period].into_iter().collect(),
        };
        let err = store.insert(&upload).unwrap_err();
        assert!(matches!(err, LedgerError::MissingColumn(Column::StorageGroup)));
    }

    #[test]
    fn insert_skips_known_inventories() {
        let path = std::env::temp_dir().join(format!(
            "shrink-ledger-store-{}-{}.csv",
            std::process::id(),
            line!()
        ));
        let _ = std::fs::remove_file(&path);
        let store = LedgerStore::open(&path).unwrap();

        let first = store
            .insert(&ledger(vec![
                row("1", "202501", "KURU", "A", -1.0),
                row("1", "202501", "KURU", "A", -2.0),
                row("1", "202501", "KURU", "B", 3.0),
            ]))
            .unwrap();
        assert_eq!(first.inserted, 2);
        assert_eq!(first.skipped, 0);
        assert!(first.message.starts_with("Loaded: 1 / 202501 / KURU"));

        let stored = store.rows().unwrap();
        let a = stored.iter().find(|r| r.product_code == "A").unwrap();
        assert!((a.diff_qty - (-2.0)).abs() < 0.01, "last duplicate wins");

        let second = store
            .insert(&ledger(vec![
                row("1", "202501", "KURU", "C", 1.0),
                row("1", "202502", "KURU", "A", 1.0),
            ]))
            .unwrap();
        assert_eq!(second.inserted, 1);
        assert_eq!(second.skipped, 1);
        assert_eq!(store.rows().unwrap().len(), 3);

        let third = store
            .insert(&ledger(vec![row("1", "202502", "KURU", "Z", 1.0)]))
            .unwrap();
        assert_eq!(third.inserted, 0);
        assert!(third.message.starts_with("All inventories already present"));

        let _ = std::fs::remove_file(&path);
    }
}
