//! Canonical column set and header normalization.
//!
//! Inventory exports arrive with the spreadsheet's Turkish headers, with the
//! short names the dashboard renames them to, or with the snake_case names of
//! the ledger database. All of them map onto one [`Column`].

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::text::fold_turkish;

/// Every column the analytics understand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    StoreCode,
    StoreName,
    SalesManager,
    RegionManager,
    StorageGroup,
    Period,
    InventoryDate,
    InventoryStartDate,
    ProductCode,
    ProductName,
    ProductGroup,
    MainGroup,
    DiffQty,
    DiffAmount,
    PartialQty,
    PartialAmount,
    PriorDiffQty,
    PriorDiffAmount,
    PriorFireQty,
    PriorFireAmount,
    CancelledQty,
    CancelledAmount,
    FireQty,
    FireAmount,
    SalesQty,
    SalesAmount,
    UnitPrice,
    NetImpactAmount,
}

impl Column {
    pub const ALL: [Column; 28] = [
        Column::StoreCode,
        Column::StoreName,
        Column::SalesManager,
        Column::RegionManager,
        Column::StorageGroup,
        Column::Period,
        Column::InventoryDate,
        Column::InventoryStartDate,
        Column::ProductCode,
        Column::ProductName,
        Column::ProductGroup,
        Column::MainGroup,
        Column::DiffQty,
        Column::DiffAmount,
        Column::PartialQty,
        Column::PartialAmount,
        Column::PriorDiffQty,
        Column::PriorDiffAmount,
        Column::PriorFireQty,
        Column::PriorFireAmount,
        Column::CancelledQty,
        Column::CancelledAmount,
        Column::FireQty,
        Column::FireAmount,
        Column::SalesQty,
        Column::SalesAmount,
        Column::UnitPrice,
        Column::NetImpactAmount,
    ];

    /// Snake_case name used by the ledger store file.
    pub fn db_name(self) -> &'static str {
        match self {
            Column::StoreCode => "magaza_kodu",
            Column::StoreName => "magaza_tanim",
            Column::SalesManager => "satis_muduru",
            Column::RegionManager => "bolge_sorumlusu",
            Column::StorageGroup => "depolama_kosulu_grubu",
            Column::Period => "envanter_donemi",
            Column::InventoryDate => "envanter_tarihi",
            Column::InventoryStartDate => "envanter_baslangic_tarihi",
            Column::ProductCode => "malzeme_kodu",
            Column::ProductName => "malzeme_tanimi",
            Column::ProductGroup => "mal_grubu_tanimi",
            Column::MainGroup => "urun_grubu_tanimi",
            Column::DiffQty => "fark_miktari",
            Column::DiffAmount => "fark_tutari",
            Column::PartialQty => "kismi_envanter_miktari",
            Column::PartialAmount => "kismi_envanter_tutari",
            Column::PriorDiffQty => "onceki_fark_miktari",
            Column::PriorDiffAmount => "onceki_fark_tutari",
            Column::PriorFireQty => "onceki_fire_miktari",
            Column::PriorFireAmount => "onceki_fire_tutari",
            Column::CancelledQty => "iptal_satir_miktari",
            Column::CancelledAmount => "iptal_satir_tutari",
            Column::FireQty => "fire_miktari",
            Column::FireAmount => "fire_tutari",
            Column::SalesQty => "satis_miktari",
            Column::SalesAmount => "satis_hasilati",
            Column::UnitPrice => "satis_fiyati",
            Column::NetImpactAmount => "net_envanter_etki_tutari",
        }
    }

    /// Spreadsheet and short-form headers accepted for this column, besides
    /// [`Column::db_name`].
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::StoreCode => &["Mağaza Kodu", "store_code"],
            Column::StoreName => &["Mağaza Tanım", "Mağaza Adı", "store_name"],
            Column::SalesManager => &["Satış Müdürü", "SM", "sales_manager"],
            Column::RegionManager => &["Bölge Sorumlusu", "BS", "region_manager"],
            Column::StorageGroup => &["Depolama Koşulu Grubu", "storage_group"],
            Column::Period => &["Envanter Dönemi", "period"],
            Column::InventoryDate => &["Envanter Tarihi", "inventory_date"],
            Column::InventoryStartDate => &["Envanter Başlangıç Tarihi", "inventory_start_date"],
            Column::ProductCode => &["Malzeme Kodu", "product_code"],
            Column::ProductName => &["Malzeme Tanımı", "Malzeme Adı", "product_name"],
            Column::ProductGroup => &["Mal Grubu Tanımı", "Ürün Grubu", "product_group"],
            Column::MainGroup => &["Ürün Grubu Tanımı", "Ana Grup", "main_group"],
            Column::DiffQty => &["Fark Miktarı", "diff_qty"],
            Column::DiffAmount => &["Fark Tutarı", "diff_amount"],
            Column::PartialQty => &["Kısmi Envanter Miktarı", "partial_qty"],
            Column::PartialAmount => &["Kısmi Envanter Tutarı", "partial_amount"],
            Column::PriorDiffQty => &["Önceki Fark Miktarı", "prior_diff_qty"],
            Column::PriorDiffAmount => &["Önceki Fark Tutarı", "prior_diff_amount"],
            Column::PriorFireQty => &["Önceki Fire Miktarı", "prior_fire_qty"],
            Column::PriorFireAmount => &["Önceki Fire Tutarı", "prior_fire_amount"],
            Column::CancelledQty => &["İptal Satır Miktarı", "cancelled_qty"],
            Column::CancelledAmount => &["İptal Satır Tutarı", "cancelled_amount"],
            Column::FireQty => &["Fire Miktarı", "fire_qty"],
            Column::FireAmount => &["Fire Tutarı", "fire_amount"],
            Column::SalesQty => &["Satış Miktarı", "sales_qty"],
            Column::SalesAmount => &["Satış Hasılatı", "Satış Tutarı", "sales_amount"],
            Column::UnitPrice => &["Satış Fiyatı", "Birim Fiyat", "unit_price"],
            Column::NetImpactAmount => &["Fark+Fire+Kısmi Envanter Tutarı", "net_impact_amount"],
        }
    }

    /// Map a raw header to its canonical column. Unknown headers yield `None`.
    pub fn from_header(header: &str) -> Option<Column> {
        header_table().get(&header_key(header)).copied()
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::DiffQty
                | Column::DiffAmount
                | Column::PartialQty
                | Column::PartialAmount
                | Column::PriorDiffQty
                | Column::PriorDiffAmount
                | Column::PriorFireQty
                | Column::PriorFireAmount
                | Column::CancelledQty
                | Column::CancelledAmount
                | Column::FireQty
                | Column::FireAmount
                | Column::SalesQty
                | Column::SalesAmount
                | Column::UnitPrice
                | Column::NetImpactAmount
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.db_name())
    }
}

/// Fold a header for matching: Turkish upper-case fold, underscores as
/// spaces, whitespace collapsed.
fn header_key(header: &str) -> String {
    fold_turkish(&header.replace('_', " "))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn header_table() -> &'static HashMap<String, Column> {
    static TABLE: OnceLock<HashMap<String, Column>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for column in Column::ALL {
            table.insert(header_key(column.db_name()), column);
            for alias in column.aliases() {
                table.insert(header_key(alias), column);
            }
        }
        table
    })
}

/// Parse a numeric cell. Empty, unparseable and non-finite cells are zero.
pub fn parse_number(cell: &str) -> f64 {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0.0;
    }
    let parsed = cell.parse::<f64>().ok().or_else(|| {
        if cell.contains(',') && !cell.contains('.') {
            cell.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    });
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Parse a date cell, ignoring any trailing time part.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let date_part = cell.trim().split(['T', ' ']).next()?;
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
