//! Record types flowing through the metric pipeline.

use serde::{Deserialize, Serialize};

/// One row as read from a composition file, before any cleaning.
///
/// Numeric cells are kept as text: they may carry currency symbols,
/// thousands separators, percent signs or accounting-style negatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Ticker symbol.
    pub symbol: String,
    /// Company display name.
    pub company_name: Option<String>,
    /// Sector label.
    pub sector: Option<String>,
    /// Index weight cell.
    pub weight: Option<String>,
    /// Net income cell.
    pub net_income: Option<String>,
}

impl RawRecord {
    /// Create a record with only a symbol set.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Set the company name.
    pub fn company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Set the sector label.
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set the raw weight cell.
    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    /// Set the raw net income cell.
    pub fn net_income(mut self, net_income: impl Into<String>) -> Self {
        self.net_income = Some(net_income.into());
        self
    }
}

/// A row after numeric normalization and default filling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Ticker symbol.
    pub symbol: String,
    /// Company display name, empty when unknown.
    pub company_name: String,
    /// Sector label, `"Unknown"` when absent.
    pub sector: String,
    /// Index weight.
    pub weight: f64,
    /// Net income.
    pub net_income: f64,
}

/// A company with every derived metric attached.
///
/// Field names serialize to the column headers of the enriched export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,

    /// Company display name.
    #[serde(rename = "Company")]
    pub company_name: String,

    /// Sector label.
    #[serde(rename = "Sector")]
    pub sector: String,

    /// Index weight as given.
    #[serde(rename = "Weight")]
    pub weight: f64,

    /// Net income as given.
    #[serde(rename = "Net_Income")]
    pub net_income: f64,

    /// Weight divided by the dataset total weight.
    #[serde(rename = "Weight_normalized")]
    pub weight_normalized: f64,

    /// Normalized weight times loss magnitude; zero for profitable companies.
    #[serde(rename = "Risk_Score")]
    pub risk_score: f64,

    /// Exposure coefficient of the company's sector.
    #[serde(rename = "Sector_Legislation_Risk")]
    pub sector_legislation_risk: f64,

    /// Sector coefficient times normalized weight times absolute net income.
    #[serde(rename = "Legislation_Impact")]
    pub legislation_impact: f64,

    /// Impact scaled by the dataset maximum, in `[0, 1]`.
    #[serde(rename = "Legislation_Risk_Score")]
    pub legislation_risk_score: f64,
}

impl CompanyRecord {
    /// Whether the company reported a loss.
    pub const fn is_loss(&self) -> bool {
        self.net_income < 0.0
    }

    /// Label used when displaying the company: its name, or the symbol when
    /// no name is known.
    pub fn display_name(&self) -> &str {
        if self.company_name.is_empty() {
            &self.symbol
        } else {
            &self.company_name
        }
    }
}

/// Per-sector totals over [`CompanyRecord`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAggregate {
    /// Sector label.
    pub sector: String,
    /// Number of companies in the sector.
    pub company_count: usize,
    /// Sum of normalized weights.
    pub total_weight: f64,
    /// Mean net income.
    pub avg_net_income: f64,
    /// Sum of net income.
    pub total_net_income: f64,
    /// Sum of risk scores.
    pub total_risk: f64,
    /// Mean sector exposure coefficient.
    pub legislation_exposure: f64,
    /// Sum of legislation impact.
    pub total_legislation_impact: f64,
}
