#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod clean;
pub mod columns;
pub mod error;
pub mod loader;
pub mod table;

pub use clean::{CleanTable, clean_table};
pub use columns::{Field, canonical_headers, normalize_column_name};
pub use error::{DataError, Result};
pub use loader::{Loader, Source, load_merged, load_records, merge_on_symbol, records_from_frame};
pub use table::{TableOptions, column_names, read_table, read_table_with};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
