//! End-to-end analysis: load, enrich, summarize.

use crate::config::AnalysisConfig;
use crate::error::Result;
use hobart_data::{Loader, Source};
use hobart_metrics::{
    CompanyMetric, CompanyRecord, MetricPipeline, PipelineOutput, RawRecord, top_qualifying,
};
use hobart_output::{ChartBook, ExportFormat, Exporter, ExposureSummary, Report, ReportBuilder};
use std::path::Path;
use tracing::info;

/// File name of the enriched export when none is given.
pub const DEFAULT_EXPORT_FILE: &str = "SP500_with_Legislation_Impact.csv";

/// Directory charts are written to when none is given.
pub const DEFAULT_CHART_DIR: &str = "sector_charts";

/// Runs the metric pipeline over a composition source.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    config: AnalysisConfig,
    loader: Loader,
}

impl Analysis {
    /// Create an analysis with the default loader.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            loader: Loader::new(),
        }
    }

    /// Use a custom loader, e.g. for another delimiter.
    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }

    /// The configuration this analysis runs with.
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Pipeline configured from the exposure table and impact basis.
    pub fn pipeline(&self) -> MetricPipeline {
        MetricPipeline::new(self.config.exposure.clone())
            .with_impact_basis(self.config.impact_basis)
    }

    /// Load `source` and run the pipeline over it.
    ///
    /// # Errors
    ///
    /// Fails when an input file is missing or lacks a required column.
    pub fn run(&self, source: &Source) -> Result<AnalysisResult> {
        let raw = self.loader.load(source)?;
        info!(
            rows = raw.len(),
            path = %source.primary_path().display(),
            "loaded composition"
        );
        Ok(self.run_records(source.primary_path().display().to_string(), &raw))
    }

    /// Run the pipeline over records already in memory.
    pub fn run_records(&self, source: impl Into<String>, raw: &[RawRecord]) -> AnalysisResult {
        let output = self.pipeline().run(raw);
        let legislation = self.config.exposure.name.clone();
        let summary = ExposureSummary::from_output(&output, &legislation);

        AnalysisResult {
            source: source.into(),
            legislation,
            output,
            summary,
            top_n: self.config.top_n,
            per_sector_top: self.config.per_sector_top,
        }
    }
}

/// Results of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Input the analysis ran on.
    pub source: String,
    /// Legislation name from the exposure table.
    pub legislation: String,
    /// Enriched records and sector aggregates.
    pub output: PipelineOutput,
    /// Exposure summary.
    pub summary: ExposureSummary,
    top_n: usize,
    per_sector_top: usize,
}

impl AnalysisResult {
    /// Companies with the highest legislation risk score, descending.
    ///
    /// Empty when no company carries impact.
    pub fn top_legislation_risk(&self) -> Vec<&CompanyRecord> {
        top_qualifying(
            &self.output.records,
            CompanyMetric::LegislationRiskScore,
            self.top_n,
        )
    }

    /// The standard chart set.
    pub fn charts(&self) -> ChartBook {
        ChartBook::standard_with(
            &self.output,
            self.top_n,
            self.per_sector_top,
            &self.legislation,
        )
    }

    /// A timestamped report of the run.
    pub fn report(&self) -> Result<Report> {
        Ok(ReportBuilder::new()
            .source(self.source.clone())
            .summary(self.summary.clone())
            .sectors(self.output.sectors.clone())
            .top_companies(self.top_legislation_risk().into_iter().cloned().collect())
            .build()?)
    }

    /// Write the enriched records; `.json` paths get JSON, anything else CSV.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.output
            .records
            .export_to_file(path, ExportFormat::from_path(path))?;
        Ok(())
    }
}
