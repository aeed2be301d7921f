//! Error types for data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading input tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// Input file does not exist
    #[error("File not found: {}", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// A required column is absent after header normalization
    #[error("Missing required column {column} in {}", path.display())]
    MissingColumn {
        /// Canonical column name
        column: String,
        /// File the column was expected in
        path: PathBuf,
    },

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
