#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod exposure;
pub mod numeric;
pub mod pipeline;
pub mod ranking;
pub mod record;

pub use error::{MetricsError, Result};
pub use exposure::{DEFAULT_LEGISLATION, ExposureTable, UNKNOWN_SECTOR};
pub use numeric::{normalize_numeric_field, numeric_or_zero};
pub use pipeline::{
    ImpactBasis, MetricPipeline, PipelineOutput, aggregate_by_sector, compute_legislation_fields,
    compute_risk_score, compute_weight_normalized, fill_defaults, normalize_legislation_risk,
};
pub use ranking::{
    CompanyMetric, SectorMetric, largest_losses, top_companies, top_per_sector, top_qualifying,
    top_sectors,
};
pub use record::{CleanRecord, CompanyRecord, RawRecord, SectorAggregate};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
