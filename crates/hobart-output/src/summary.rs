//! Console summary of legislative exposure.
//!
//! The summary condenses a pipeline run into the figures printed after an
//! analysis: mean exposure per sector, which sectors and how many companies
//! carry any impact, and how the index splits across sectors.

use hobart_metrics::{PipelineOutput, SectorMetric, top_sectors};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Mean exposure coefficient of one sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorExposure {
    /// Sector name.
    pub sector: String,

    /// Mean exposure coefficient over the sector's companies.
    pub exposure: f64,
}

/// Number of companies in one sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectorCount {
    /// Sector name.
    pub sector: String,

    /// Companies in the sector.
    pub count: usize,
}

/// Exposure summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureSummary {
    /// Legislation the exposure table describes.
    pub legislation: String,

    /// Mean exposure per sector, highest first.
    pub sector_exposure: Vec<SectorExposure>,

    /// Sectors with at least one company carrying impact, by name.
    pub affected_sectors: Vec<String>,

    /// Companies whose legislation impact is positive.
    pub exposed_companies: usize,

    /// Companies analyzed.
    pub total_companies: usize,

    /// Companies reporting a loss.
    pub loss_count: usize,

    /// Sum of raw weights before normalization.
    pub total_weight: f64,

    /// Company count per sector, largest first.
    pub sector_counts: Vec<SectorCount>,
}

impl ExposureSummary {
    /// Summarize a pipeline run.
    pub fn from_output(output: &PipelineOutput, legislation: &str) -> Self {
        let sector_exposure = top_sectors(
            &output.sectors,
            SectorMetric::LegislationExposure,
            output.sectors.len(),
        )
        .into_iter()
        .map(|s| SectorExposure {
            sector: s.sector.clone(),
            exposure: s.legislation_exposure,
        })
        .collect();

        let exposed: Vec<_> = output
            .records
            .iter()
            .filter(|r| r.legislation_impact > 0.0)
            .collect();
        let affected_sectors = exposed
            .iter()
            .map(|r| r.sector.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &output.records {
            *counts.entry(record.sector.as_str()).or_default() += 1;
        }
        let mut sector_counts: Vec<SectorCount> = counts
            .into_iter()
            .map(|(sector, count)| SectorCount {
                sector: sector.to_string(),
                count,
            })
            .collect();
        sector_counts.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            legislation: legislation.to_string(),
            sector_exposure,
            affected_sectors,
            exposed_companies: exposed.len(),
            total_companies: output.len(),
            loss_count: output.loss_count(),
            total_weight: output.total_weight,
            sector_counts,
        }
    }

    /// Share of companies with positive impact, in percent.
    pub fn exposed_pct(&self) -> f64 {
        if self.total_companies == 0 {
            return 0.0;
        }
        self.exposed_companies as f64 / self.total_companies as f64 * 100.0
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nLegislative Exposure: {}\n", self.legislation));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str("\nCoverage:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  Companies analyzed:       {}\n",
            self.total_companies
        ));
        output.push_str(&format!(
            "  Companies exposed:        {} ({:.1}%)\n",
            self.exposed_companies,
            self.exposed_pct()
        ));
        output.push_str(&format!("  Companies with losses:    {}\n", self.loss_count));
        output.push_str(&format!("  Raw weight sum:           {:.4}\n", self.total_weight));
        output.push_str(&format!(
            "  Affected sectors:         {}\n",
            if self.affected_sectors.is_empty() {
                "none".to_string()
            } else {
                self.affected_sectors.join(", ")
            }
        ));

        if !self.sector_exposure.is_empty() {
            output.push_str("\nExposure by Sector:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<40} {:>12} {:>12}\n",
                "Sector", "Exposure", "Companies"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for row in &self.sector_exposure {
                output.push_str(&format!(
                    "{:<40} {:>12.3} {:>12}\n",
                    row.sector,
                    row.exposure,
                    self.count_for(&row.sector)
                ));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Legislative Exposure: {}\n\n", self.legislation));

        output.push_str("## Coverage\n\n");
        output.push_str(&format!(
            "- **Companies analyzed:** {}\n",
            self.total_companies
        ));
        output.push_str(&format!(
            "- **Companies exposed:** {} ({:.1}%)\n",
            self.exposed_companies,
            self.exposed_pct()
        ));
        output.push_str(&format!("- **Companies with losses:** {}\n", self.loss_count));
        output.push_str(&format!("- **Raw weight sum:** {:.4}\n", self.total_weight));
        if !self.affected_sectors.is_empty() {
            output.push_str(&format!(
                "- **Affected sectors:** {}\n",
                self.affected_sectors.join(", ")
            ));
        }
        output.push('\n');

        if !self.sector_exposure.is_empty() {
            output.push_str("## Exposure by Sector\n\n");
            output.push_str("| Sector | Exposure | Companies |\n");
            output.push_str("|--------|----------|-----------|\n");

            for row in &self.sector_exposure {
                output.push_str(&format!(
                    "| {} | {:.3} | {} |\n",
                    row.sector,
                    row.exposure,
                    self.count_for(&row.sector)
                ));
            }
        }

        output
    }

    fn count_for(&self, sector: &str) -> usize {
        self.sector_counts
            .iter()
            .find(|c| c.sector == sector)
            .map_or(0, |c| c.count)
    }
}

impl fmt::Display for ExposureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Legislative Exposure: {}", self.legislation)?;
        writeln!(
            f,
            "  Exposed: {}/{} companies ({:.1}%)",
            self.exposed_companies,
            self.total_companies,
            self.exposed_pct()
        )?;
        writeln!(f, "  Losses: {}", self.loss_count)?;
        writeln!(f, "  Affected sectors: {}", self.affected_sectors.len())?;
        Ok(())
    }
}
