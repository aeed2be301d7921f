//! JSON reports of an analysis run.

use crate::summary::ExposureSummary;
use chrono::{DateTime, Utc};
use hobart_metrics::{CompanyRecord, SectorAggregate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The builder was given no summary.
    #[error("report has no exposure summary")]
    MissingSummary,
}

/// A report of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Input the analysis ran on.
    pub source: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Exposure summary.
    pub summary: ExposureSummary,

    /// Sector aggregates, by sector name.
    pub sectors: Vec<SectorAggregate>,

    /// Highest legislation risk scores, descending.
    pub top_companies: Vec<CompanyRecord>,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(
        source: String,
        summary: ExposureSummary,
        sectors: Vec<SectorAggregate>,
        top_companies: Vec<CompanyRecord>,
    ) -> Self {
        Self {
            source,
            timestamp: Utc::now(),
            summary,
            sectors,
            top_companies,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "wrote report");
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    source: Option<String>,
    summary: Option<ExposureSummary>,
    sectors: Vec<SectorAggregate>,
    top_companies: Vec<CompanyRecord>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input description.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the exposure summary.
    pub fn summary(mut self, summary: ExposureSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Set the sector aggregates.
    pub fn sectors(mut self, sectors: Vec<SectorAggregate>) -> Self {
        self.sectors = sectors;
        self
    }

    /// Set the highest-scoring companies.
    pub fn top_companies(mut self, companies: Vec<CompanyRecord>) -> Self {
        self.top_companies = companies;
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let summary = self.summary.ok_or(ReportError::MissingSummary)?;
        Ok(Report::new(
            self.source.unwrap_or_default(),
            summary,
            self.sectors,
            self.top_companies,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_metrics::{MetricPipeline, RawRecord};

    fn summary() -> (ExposureSummary, Vec<SectorAggregate>) {
        let raw = vec![RawRecord::new("XOM").sector("Energy").weight("1").net_income("-5")];
        let output = MetricPipeline::default().run(&raw);
        (ExposureSummary::from_output(&output, "H.R.1"), output.sectors)
    }

    #[test]
    fn test_report_builder() {
        let (summary, sectors) = summary();
        let report = ReportBuilder::new()
            .source("SP500_with_Sector_Clean.csv")
            .summary(summary)
            .sectors(sectors)
            .build()
            .unwrap();

        assert_eq!(report.source, "SP500_with_Sector_Clean.csv");
        assert_eq!(report.sectors.len(), 1);
        assert!(report.top_companies.is_empty());
    }

    #[test]
    fn test_report_requires_summary() {
        let err = ReportBuilder::new().source("x.csv").build().unwrap_err();
        assert!(matches!(err, ReportError::MissingSummary));
    }

    #[test]
    fn test_report_json() {
        let (summary, sectors) = summary();
        let report = Report::new("x.csv".to_string(), summary, sectors, Vec::new());
        let json = report.to_json().unwrap();

        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"legislation\": \"H.R.1\""));
        assert!(json.contains("\"sector\": \"Energy\""));
    }
}
