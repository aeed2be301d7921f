#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod error;

// Re-export main types from sub-crates
pub use hobart_data as data;
pub use hobart_metrics as metrics;
pub use hobart_output as output;

pub use analysis::{Analysis, AnalysisResult, DEFAULT_CHART_DIR, DEFAULT_EXPORT_FILE};
pub use config::AnalysisConfig;
pub use error::{HobartError, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
