//! Inventory-count ledger.
//!
//! Normalizes heterogeneous inventory exports onto one canonical row schema
//! and keeps a local insert-if-absent store of uploaded counts.

pub mod cancellations;
pub mod error;
pub mod filter;
pub mod loader;
pub mod row;
pub mod schema;
pub mod store;
pub mod text;

pub use cancellations::{CancellationIndex, CancellationRecord};
pub use error::{LedgerError, LedgerResult};
pub use filter::Scope;
pub use loader::{load_ledger, load_ledger_file, Ledger};
pub use row::{approx_zero, LedgerRow, EPSILON};
pub use schema::Column;
pub use store::{InsertOutcome, LedgerStore};
