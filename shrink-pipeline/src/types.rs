use std::fmt;

use serde::Serialize;
use shrink_ledger::{LedgerRow, Scope};

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// What slice of the ledger a pipeline run analyzes.
#[derive(Clone, Debug, Default)]
pub struct AnalysisQuery {
    pub request_id: String,
    pub scope: Scope,
}

impl AnalysisQuery {
    pub fn new(request_id: impl Into<String>, scope: Scope) -> Self {
        Self {
            request_id: request_id.into(),
            scope,
        }
    }
}

impl HasRequestId for AnalysisQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Risk levels
// ---------------------------------------------------------------------------

/// Severity band of a risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Critical,
    Risky,
    Attention,
    Clean,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Critical => write!(f, "\u{1F534} KRİTİK"),
            RiskLevel::Risky => write!(f, "\u{1F7E0} RİSKLİ"),
            RiskLevel::Attention => write!(f, "\u{1F7E1} DİKKAT"),
            RiskLevel::Clean => write!(f, "\u{1F7E2} TEMİZ"),
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// One product line considered for the top risky products list.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProductCandidate {
    pub product_code: String,
    pub product_name: String,
    pub product_group: String,
    pub diff_qty: f64,
    pub diff_amount: f64,
    pub fire_amount: f64,

    // Detector flags (populated by hydrators)
    pub internal_theft: bool,
    pub chronic: bool,

    // Scoring fields (populated by scorers)
    pub risk_points: Option<i32>,
    pub risk_reasons: Vec<String>,

    #[serde(skip)]
    pub row: LedgerRow,
}

impl ProductCandidate {
    pub fn from_row(row: &LedgerRow) -> Self {
        Self {
            product_code: row.product_code.clone(),
            product_name: row.product_name.clone(),
            product_group: row.product_group.clone(),
            diff_qty: row.diff_qty,
            diff_amount: row.diff_amount,
            fire_amount: row.fire_amount,
            row: row.clone(),
            ..Default::default()
        }
    }
}

/// One store's inventory metrics and signal counts, the unit of the
/// region digest.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StoreCandidate {
    pub store_code: String,
    pub store_name: String,
    pub sales_manager: String,
    pub region_manager: String,

    pub sales: f64,
    /// Diff amount plus partial recount amount.
    pub diff: f64,
    pub fire: f64,
    /// Diff plus fire.
    pub total_loss: f64,
    pub diff_pct: f64,
    pub fire_pct: f64,
    pub total_pct: f64,
    pub days: i64,
    pub daily_diff: f64,
    pub daily_fire: f64,

    pub internal_theft_count: usize,
    pub chronic_count: usize,
    pub chronic_fire_count: usize,
    /// Net cigarette shortage in units, zero when there is none.
    pub cigarette_shortage: f64,
    pub fire_manipulation_count: usize,
    pub cash_qty: f64,
    pub cash_amount: f64,

    // Scoring fields (populated by scorers)
    pub risk_score: Option<u32>,
    pub risk_level: Option<RiskLevel>,
    pub risk_reasons: Vec<String>,
}
