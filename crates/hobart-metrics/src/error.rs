//! Error types for metric derivation.

use thiserror::Error;

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that can occur while configuring the metric pipeline.
///
/// Deriving metrics never fails: malformed numeric cells degrade to zero.
/// Only loading or building an exposure table can be rejected.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Exposure coefficient outside of `[0, 1]` or not finite
    #[error("Invalid exposure coefficient {coefficient} for sector {sector}: must lie in [0, 1]")]
    InvalidCoefficient {
        /// Sector the coefficient was given for
        sector: String,
        /// Offending value
        coefficient: f64,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Exposure table deserialization error
    #[error("Exposure table parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
