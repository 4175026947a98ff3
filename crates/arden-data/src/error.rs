//! Error types for holdings data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or transforming holdings data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required column is absent from the input file.
    #[error("missing required column: {column}")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// A column held a null where a value is required.
    #[error("null value in column {column} at row {row}")]
    NullValue {
        /// Column that held the null.
        column: String,
        /// Zero-based row index of the null.
        row: usize,
    },

    /// The table holds no usable rows.
    #[error("empty table: {reason}")]
    Empty {
        /// Why the table is considered empty.
        reason: String,
    },

    /// Polars error
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
