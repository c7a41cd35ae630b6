//! Ledger error types.
//!
//! Every failure mode has a named variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Column;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error at line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input has no header row")]
    EmptyHeader,

    #[error("Required column '{0}' not found")]
    MissingColumn(Column),
}

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
