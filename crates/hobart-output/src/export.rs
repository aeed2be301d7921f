//! CSV and JSON export of enriched companies and sector aggregates.

use hobart_metrics::{CompanyRecord, SectorAggregate};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Column headers of the enriched company export, in order.
pub const COMPANY_COLUMNS: [&str; 10] = [
    "Symbol",
    "Company",
    "Sector",
    "Weight",
    "Net_Income",
    "Weight_normalized",
    "Risk_Score",
    "Sector_Legislation_Risk",
    "Legislation_Impact",
    "Legislation_Risk_Score",
];

/// Column headers of the sector aggregate export, in order.
pub const SECTOR_COLUMNS: [&str; 8] = [
    "sector",
    "company_count",
    "total_weight",
    "avg_net_income",
    "total_net_income",
    "total_risk",
    "legislation_exposure",
    "total_legislation_impact",
];

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized CSV was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Pick a format from a file extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::PrettyJson,
            _ => Self::Csv,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        info!(path = %path.display(), format = format.extension(), "wrote export");
        Ok(())
    }
}

/// Serialize rows as CSV. The header row is written even when there are no rows.
fn rows_to_csv<T: Serialize>(rows: &[T], headers: &[&str]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    if rows.is_empty() {
        wtr.write_record(headers)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn rows_to_string<T: Serialize>(
    rows: &[T],
    headers: &[&str],
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => rows_to_csv(rows, headers),
        ExportFormat::Json => Ok(serde_json::to_string(rows)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(rows)?),
    }
}

impl Exporter for [CompanyRecord] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        rows_to_string(self, &COMPANY_COLUMNS, format)
    }
}

impl Exporter for [SectorAggregate] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        rows_to_string(self, &SECTOR_COLUMNS, format)
    }
}
