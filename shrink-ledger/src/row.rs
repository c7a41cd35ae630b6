use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::{parse_date, parse_number, Column};

/// Tolerance for "exact" matches and zero checks on quantities and amounts.
pub const EPSILON: f64 = 0.01;

/// Whether a quantity or amount is zero within [`EPSILON`].
pub fn approx_zero(x: f64) -> bool {
    x.abs() <= EPSILON
}

/// One product line of one store's inventory count, in canonical form.
///
/// Serialized field names are the ledger store's snake_case headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "magaza_kodu")]
    pub store_code: String,
    #[serde(rename = "magaza_tanim")]
    pub store_name: String,
    #[serde(rename = "satis_muduru")]
    pub sales_manager: String,
    #[serde(rename = "bolge_sorumlusu")]
    pub region_manager: String,
    #[serde(rename = "depolama_kosulu_grubu")]
    pub storage_group: String,
    #[serde(rename = "envanter_donemi")]
    pub period: String,
    #[serde(rename = "envanter_tarihi")]
    pub inventory_date: Option<NaiveDate>,
    #[serde(rename = "envanter_baslangic_tarihi")]
    pub inventory_start_date: Option<NaiveDate>,
    #[serde(rename = "malzeme_kodu")]
    pub product_code: String,
    #[serde(rename = "malzeme_tanimi")]
    pub product_name: String,
    #[serde(rename = "mal_grubu_tanimi")]
    pub product_group: String,
    #[serde(rename = "urun_grubu_tanimi")]
    pub main_group: String,

    #[serde(rename = "fark_miktari")]
    pub diff_qty: f64,
    #[serde(rename = "fark_tutari")]
    pub diff_amount: f64,
    #[serde(rename = "kismi_envanter_miktari")]
    pub partial_qty: f64,
    #[serde(rename = "kismi_envanter_tutari")]
    pub partial_amount: f64,
    #[serde(rename = "onceki_fark_miktari")]
    pub prior_diff_qty: f64,
    #[serde(rename = "onceki_fark_tutari")]
    pub prior_diff_amount: f64,
    #[serde(rename = "onceki_fire_miktari")]
    pub prior_fire_qty: f64,
    #[serde(rename = "onceki_fire_tutari")]
    pub prior_fire_amount: f64,
    #[serde(rename = "iptal_satir_miktari")]
    pub cancelled_qty: f64,
    #[serde(rename = "iptal_satir_tutari")]
    pub cancelled_amount: f64,
    #[serde(rename = "fire_miktari")]
    pub fire_qty: f64,
    #[serde(rename = "fire_tutari")]
    pub fire_amount: f64,
    #[serde(rename = "satis_miktari")]
    pub sales_qty: f64,
    #[serde(rename = "satis_hasilati")]
    pub sales_amount: f64,
    #[serde(rename = "satis_fiyati")]
    pub unit_price: f64,
    #[serde(rename = "net_envanter_etki_tutari")]
    pub net_impact_amount: f64,
}

impl LedgerRow {
    /// Net quantity delta across the current count, the partial recount and
    /// the prior period.
    pub fn total_qty(&self) -> f64 {
        self.diff_qty + self.partial_qty + self.prior_diff_qty
    }

    /// A row whose shortages and surpluses cancel out over the periods.
    pub fn is_balanced(&self) -> bool {
        approx_zero(self.total_qty())
    }

    /// Text value of a text column; numeric and date columns yield `None`.
    pub fn text(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::StoreCode => &self.store_code,
            Column::StoreName => &self.store_name,
            Column::SalesManager => &self.sales_manager,
            Column::RegionManager => &self.region_manager,
            Column::StorageGroup => &self.storage_group,
            Column::Period => &self.period,
            Column::ProductCode => &self.product_code,
            Column::ProductName => &self.product_name,
            Column::ProductGroup => &self.product_group,
            Column::MainGroup => &self.main_group,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Assign a raw cell to the field behind `column`.
    pub(crate) fn set_cell(&mut self, column: Column, cell: &str) {
        let text = || cell.trim().to_string();
        match column {
            Column::StoreCode => self.store_code = text(),
            Column::StoreName => self.store_name = text(),
            Column::SalesManager => self.sales_manager = text(),
            Column::RegionManager => self.region_manager = text(),
            Column::StorageGroup => self.storage_group = text(),
            Column::Period => self.period = text(),
            Column::InventoryDate => self.inventory_date = parse_date(cell),
            Column::InventoryStartDate => self.inventory_start_date = parse_date(cell),
            Column::ProductCode => self.product_code = text(),
            Column::ProductName => self.product_name = text(),
            Column::ProductGroup => self.product_group = text(),
            Column::MainGroup => self.main_group = text(),
            Column::DiffQty => self.diff_qty = parse_number(cell),
            Column::DiffAmount => self.diff_amount = parse_number(cell),
            Column::PartialQty => self.partial_qty = parse_number(cell),
            Column::PartialAmount => self.partial_amount = parse_number(cell),
            Column::PriorDiffQty => self.prior_diff_qty = parse_number(cell),
            Column::PriorDiffAmount => self.prior_diff_amount = parse_number(cell),
            Column::PriorFireQty => self.prior_fire_qty = parse_number(cell),
            Column::PriorFireAmount => self.prior_fire_amount = parse_number(cell),
            Column::CancelledQty => self.cancelled_qty = parse_number(cell),
            Column::CancelledAmount => self.cancelled_amount = parse_number(cell),
            Column::FireQty => self.fire_qty = parse_number(cell),
            Column::FireAmount => self.fire_amount = parse_number(cell),
            Column::SalesQty => self.sales_qty = parse_number(cell),
            Column::SalesAmount => self.sales_amount = parse_number(cell),
            Column::UnitPrice => self.unit_price = parse_number(cell),
            Column::NetImpactAmount => self.net_impact_amount = parse_number(cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_qty_spans_three_periods() {
        let row = LedgerRow {
            diff_qty: -5.0,
            partial_qty: 2.0,
            prior_diff_qty: 3.0,
            ..Default::default()
        };
        assert!((row.total_qty() - 0.0).abs() < 1e-9);
        assert!(row.is_balanced());

        let row = LedgerRow { diff_qty: -0.5, ..Default::default() };
        assert!(!row.is_balanced());
    }

    #[test]
    fn approx_zero_uses_shared_tolerance() {
        assert!(approx_zero(0.0));
        assert!(approx_zero(-0.01));
        assert!(!approx_zero(0.011));
    }

    #[test]
    fn set_cell_parses_by_column_kind() {
        let mut row = LedgerRow::default();
        row.set_cell(Column::StoreCode, " 1001 ");
        row.set_cell(Column::DiffQty, "-3,5");
        row.set_cell(Column::InventoryDate, "14.03.2025");
        row.set_cell(Column::UnitPrice, "");
        assert_eq!(row.store_code, "1001");
        assert_eq!(row.diff_qty, -3.5);
        assert_eq!(row.inventory_date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(row.unit_price, 0.0);
        assert_eq!(row.text(Column::StoreCode), Some("1001"));
        assert_eq!(row.text(Column::DiffQty), None);
    }
}
