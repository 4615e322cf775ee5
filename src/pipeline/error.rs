//! Error types for the cleaning pipeline.
//!
//! Every variant carries enough context (paths, column names, row counts) to
//! diagnose a failed run from the message alone.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that abort an ETL run.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The source could not be read or a destination could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory the operation touched
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The loaded columns do not match the fixed schema contract.
    ///
    /// Raised before any row is processed. `detail` names the missing,
    /// unexpected or misplaced columns.
    #[error("Schema mismatch: {detail}. Expected columns {expected:?}, found {found:?}")]
    Schema {
        expected: Vec<String>,
        found: Vec<String>,
        detail: String,
    },

    /// A numeric column has zero (or non-finite) variance, so z-scores are undefined.
    #[error("Column '{column}' has zero variance across {rows} rows; standardization is undefined")]
    DegenerateColumn { column: String, rows: usize },

    /// No rows survived cleaning.
    #[error(
        "No rows left to encode: {input_rows} row(s) after deduplication, \
         {quarantined} quarantined, {dropped} dropped for null values"
    )]
    EmptyDataset {
        input_rows: usize,
        quarantined: usize,
        dropped: usize,
    },

    /// Too few rows to give both partitions at least one row.
    #[error("Cannot split {rows} row(s) with test fraction {test_fraction}: train and test both need at least one row")]
    InsufficientRows { rows: usize, test_fraction: f64 },

    /// CSV parsing or serialisation failure reported by polars.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl EtlError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.into(),
            source,
        }
    }
}
