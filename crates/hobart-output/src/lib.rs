#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod report;
pub mod summary;

pub use chart::{
    Bar, BarChart, ChartBook, ChartFormat, DEFAULT_BAR_WIDTH, PER_SECTOR_TOP, sanitize_file_name,
};
pub use export::{COMPANY_COLUMNS, ExportError, ExportFormat, Exporter, SECTOR_COLUMNS};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{ExposureSummary, SectorCount, SectorExposure};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
