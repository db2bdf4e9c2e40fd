//! Data error types.

use recon_spi::ReconError;
use thiserror::Error;

/// Errors raised while loading a return series.
#[derive(Debug, Error)]
pub enum DataError {
    /// File could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required column absent from the header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Unparseable date cell
    #[error("Invalid date at row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    /// Unparseable numeric cell
    #[error("Parse error at row {row}, column '{column}': {value:?}")]
    ParseError {
        row: usize,
        column: String,
        value: String,
    },

    /// Header present but no data rows, or no sector columns
    #[error("No data returned")]
    NoData,

    /// Rows parsed but do not form a valid series
    #[error("Invalid series: {0}")]
    Series(#[from] ReconError),
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
