//! Error types for end-to-end analyses.

use hobart_data::DataError;
use hobart_metrics::MetricsError;
use hobart_output::{ExportError, ReportError};
use thiserror::Error;

/// Errors raised by an analysis run.
#[derive(Debug, Error)]
pub enum HobartError {
    /// Input could not be loaded.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Exposure table or metric configuration is invalid.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Export or chart writing failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Report generation failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, HobartError>;
