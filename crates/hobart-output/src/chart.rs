//! Horizontal bar charts of rankings.
//!
//! Charts render as fixed-width text bars for the terminal or as JSON series
//! that a plotting front end can pick up. A [`ChartBook`] collects the
//! standard set produced after an analysis.

use crate::export::ExportError;
use hobart_metrics::{
    CompanyMetric, CompanyRecord, PipelineOutput, SectorAggregate, SectorMetric, largest_losses,
    top_companies, top_per_sector, top_qualifying, top_sectors,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Bar length used by [`BarChart`]'s `Display`.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Companies shown per sector in the per-sector breakdowns.
pub const PER_SECTOR_TOP: usize = 3;

const MAX_LABEL_WIDTH: usize = 32;

/// One bar of a chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    /// Category label.
    pub label: String,

    /// Bar value.
    pub value: f64,
}

/// A horizontal bar chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarChart {
    /// File stem the chart is saved under.
    pub name: String,

    /// Chart title.
    pub title: String,

    /// Label of the category axis.
    pub category_label: String,

    /// Label of the value axis.
    pub value_label: String,

    /// Bars, top to bottom.
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Create an empty chart.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        category_label: impl Into<String>,
        value_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            category_label: category_label.into(),
            value_label: value_label.into(),
            bars: Vec::new(),
        }
    }

    /// Append a bar.
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.bars.push(Bar {
            label: label.into(),
            value,
        });
    }

    /// Replace the bars.
    pub fn with_bars(mut self, bars: impl IntoIterator<Item = (String, f64)>) -> Self {
        self.bars = bars
            .into_iter()
            .map(|(label, value)| Bar { label, value })
            .collect();
        self
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Render as text with bars up to `width` characters long.
    ///
    /// Bar length is proportional to the absolute value, so losses draw
    /// like gains; the printed value keeps its sign.
    pub fn render_text(&self, width: usize) -> String {
        let label_width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .chain(std::iter::once(self.category_label.chars().count()))
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH);
        let max_abs = self.bars.iter().map(|b| b.value.abs()).fold(0.0, f64::max);
        let rule_width = label_width + width + 18;

        let mut output = String::new();
        output.push_str(&format!("{}\n", self.title));
        output.push_str(&"=".repeat(rule_width));
        output.push('\n');
        output.push_str(&format!(
            "{:<label_width$} {:<width$} {:>15}\n",
            self.category_label, "", self.value_label
        ));
        output.push_str(&"-".repeat(rule_width));
        output.push('\n');

        for bar in &self.bars {
            let len = if max_abs > 0.0 {
                ((bar.value.abs() / max_abs) * width as f64).round() as usize
            } else {
                0
            };
            output.push_str(&format!(
                "{:<label_width$} {:<width$} {:>15.4}\n",
                truncate_label(&bar.label, label_width),
                "#".repeat(len),
                bar.value
            ));
        }

        output
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text(DEFAULT_BAR_WIDTH))
    }
}

fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut short: String = label.chars().take(width.saturating_sub(2)).collect();
    short.push_str("..");
    short
}

/// Replace every character that is not alphanumeric or `_` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// On-disk chart format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    /// Text bars.
    #[default]
    Text,

    /// JSON series.
    Json,
}

impl ChartFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for ChartFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// An ordered set of non-empty charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartBook {
    charts: Vec<BarChart>,
}

impl ChartBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chart. Charts without bars are dropped.
    pub fn push(&mut self, chart: BarChart) {
        if chart.is_empty() {
            info!(chart = %chart.name, "no qualifying rows, chart skipped");
            return;
        }
        self.charts.push(chart);
    }

    /// Company rankings: weight, net income, largest losses and risk score.
    pub fn companies(output: &PipelineOutput, top_n: usize) -> Self {
        let mut book = Self::new();
        let records = &output.records;

        book.push(
            company_chart(
                format!("Top{top_n}_Companies_Weight"),
                format!("Top {top_n} Companies by Index Weight"),
                CompanyMetric::Weight,
            )
            .with_bars(company_bars(
                &top_companies(records, CompanyMetric::Weight, top_n),
                CompanyMetric::Weight,
            )),
        );
        book.push(
            company_chart(
                format!("Top{top_n}_Companies_NetIncome"),
                format!("Top {top_n} Companies by Net Income"),
                CompanyMetric::NetIncome,
            )
            .with_bars(company_bars(
                &top_companies(records, CompanyMetric::NetIncome, top_n),
                CompanyMetric::NetIncome,
            )),
        );
        book.push(
            company_chart(
                format!("Top{top_n}_Companies_Losses"),
                format!("Top {top_n} Companies with Losses"),
                CompanyMetric::NetIncome,
            )
            .with_bars(company_bars(
                &largest_losses(records, top_n),
                CompanyMetric::NetIncome,
            )),
        );
        book.push(
            company_chart(
                format!("Top{top_n}_Companies_Risk"),
                format!("Top {top_n} Companies by Risk (Weight x Loss)"),
                CompanyMetric::RiskScore,
            )
            .with_bars(company_bars(
                &top_qualifying(records, CompanyMetric::RiskScore, top_n),
                CompanyMetric::RiskScore,
            )),
        );

        book
    }

    /// The full chart set of a legislation analysis.
    ///
    /// Company rankings, then sector rankings, mean exposure by sector and
    /// the per-sector top [`PER_SECTOR_TOP`] companies by risk and by
    /// legislation score.
    pub fn standard(output: &PipelineOutput, top_n: usize, legislation: &str) -> Self {
        Self::standard_with(output, top_n, PER_SECTOR_TOP, legislation)
    }

    /// [`ChartBook::standard`] with `per_sector` companies in each sector breakdown.
    pub fn standard_with(
        output: &PipelineOutput,
        top_n: usize,
        per_sector: usize,
        legislation: &str,
    ) -> Self {
        let mut book = Self::companies(output, top_n);
        let sectors = &output.sectors;

        for (metric, name, title, positive_only) in [
            (
                SectorMetric::TotalWeight,
                "Weight",
                format!("Top {top_n} Sectors by Weight"),
                false,
            ),
            (
                SectorMetric::TotalRisk,
                "Risk",
                format!("Top {top_n} Sectors by Risk"),
                true,
            ),
            (
                SectorMetric::TotalNetIncome,
                "NetIncome",
                format!("Top {top_n} Sectors by Net Income"),
                false,
            ),
            (
                SectorMetric::TotalLegislationImpact,
                "LegislationImpact",
                format!("Top {top_n} Sectors by {legislation} Legislative Impact"),
                true,
            ),
        ] {
            let ranked: Vec<&SectorAggregate> = top_sectors(sectors, metric, top_n)
                .into_iter()
                .filter(|s| !positive_only || metric.value(s) > 0.0)
                .collect();
            book.push(
                BarChart::new(
                    format!("Top{top_n}_Sectors_{name}"),
                    title,
                    "Sector",
                    metric.to_string(),
                )
                .with_bars(sector_bars(&ranked, metric)),
            );
        }

        let by_exposure = top_sectors(sectors, SectorMetric::LegislationExposure, sectors.len());
        book.push(
            BarChart::new(
                "Legislation_Impact_By_Sector",
                format!("Mean {legislation} Exposure by Sector"),
                "Sector",
                "Mean exposure (0 = low, 1 = high)",
            )
            .with_bars(sector_bars(&by_exposure, SectorMetric::LegislationExposure)),
        );

        for (metric, prefix, title) in [
            (CompanyMetric::RiskScore, "Risk", "Riskiest Companies"),
            (
                CompanyMetric::LegislationRiskScore,
                "Legislation",
                "Companies by Legislative Impact",
            ),
        ] {
            for (sector, ranked) in top_per_sector(&output.records, metric, per_sector) {
                book.push(
                    company_chart(
                        format!("Top{per_sector}_{prefix}_{sector}"),
                        format!("Top {per_sector} {title} - {sector}"),
                        metric,
                    )
                    .with_bars(company_bars(&ranked, metric)),
                );
            }
        }

        book
    }

    /// Charts in insertion order.
    pub fn charts(&self) -> &[BarChart] {
        &self.charts
    }

    /// Look a chart up by file stem.
    pub fn get(&self, name: &str) -> Option<&BarChart> {
        self.charts.iter().find(|c| c.name == name)
    }

    /// Number of charts.
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    /// True when no chart has any bars.
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Write one file per chart into `dir`, creating it if needed.
    ///
    /// Returns the written paths in chart order.
    pub fn write_to_dir(
        &self,
        dir: &Path,
        format: ChartFormat,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.charts.len());
        for chart in &self.charts {
            let path = dir.join(format!(
                "{}.{}",
                sanitize_file_name(&chart.name),
                format.extension()
            ));
            let content = match format {
                ChartFormat::Text => chart.render_text(DEFAULT_BAR_WIDTH),
                ChartFormat::Json => chart.to_json()?,
            };
            fs::write(&path, content)?;
            info!(path = %path.display(), "chart saved");
            written.push(path);
        }

        Ok(written)
    }
}

fn company_chart(name: String, title: String, metric: CompanyMetric) -> BarChart {
    BarChart::new(name, title, "Company", metric.to_string())
}

fn company_bars(ranked: &[&CompanyRecord], metric: CompanyMetric) -> Vec<(String, f64)> {
    ranked
        .iter()
        .map(|r| (r.display_name().to_string(), metric.value(r)))
        .collect()
}

fn sector_bars(ranked: &[&SectorAggregate], metric: SectorMetric) -> Vec<(String, f64)> {
    ranked
        .iter()
        .map(|s| (s.sector.clone(), metric.value(s)))
        .collect()
}
