//! Sector legislative-exposure coefficients.
//!
//! The table maps a sector label to a coefficient in `[0, 1]` describing how
//! strongly a piece of legislation bears on companies in that sector. It is
//! plain configuration: the pipeline receives it by value, tests build their
//! own, and the CLI can load one from a JSON file.

use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Name of the legislation modelled by the default table.
pub const DEFAULT_LEGISLATION: &str = "H.R.1";

/// Sector label used when a row carries no sector.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Sector to exposure-coefficient lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureTable {
    /// Legislation the coefficients describe (used in report titles).
    #[serde(default = "default_name")]
    pub name: String,
    coefficients: BTreeMap<String, f64>,
}

fn default_name() -> String {
    DEFAULT_LEGISLATION.to_string()
}

impl ExposureTable {
    /// Create an empty table; every sector maps to zero.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coefficients: BTreeMap::new(),
        }
    }

    /// Parse a table from JSON.
    ///
    /// Expected shape: `{"name": "H.R.1", "coefficients": {"Energy": 1.0}}`.
    /// `name` is optional.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize the table as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the coefficient for a sector, replacing any previous value.
    pub fn set(&mut self, sector: impl Into<String>, coefficient: f64) -> Result<()> {
        let sector = sector.into();
        check_coefficient(&sector, coefficient)?;
        self.coefficients.insert(sector, coefficient);
        Ok(())
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with_override(mut self, sector: impl Into<String>, coefficient: f64) -> Result<Self> {
        self.set(sector, coefficient)?;
        Ok(self)
    }

    /// Coefficient for a sector; unmapped sectors are not exposed.
    pub fn coefficient(&self, sector: &str) -> f64 {
        self.coefficients.get(sector).copied().unwrap_or(0.0)
    }

    /// Whether the table has an explicit entry for the sector.
    pub fn contains(&self, sector: &str) -> bool {
        self.coefficients.contains_key(sector)
    }

    /// Iterate entries in sector-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.coefficients.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// Entries sorted by descending coefficient, ties by sector name.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Number of mapped sectors.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether no sector is mapped.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Check every coefficient is finite and within `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        self.coefficients
            .iter()
            .try_for_each(|(sector, c)| check_coefficient(sector, *c))
    }
}

fn check_coefficient(sector: &str, coefficient: f64) -> Result<()> {
    if coefficient.is_finite() && (0.0..=1.0).contains(&coefficient) {
        Ok(())
    } else {
        Err(MetricsError::InvalidCoefficient {
            sector: sector.to_string(),
            coefficient,
        })
    }
}

impl Default for ExposureTable {
    /// H.R.1 exposure by sector.
    ///
    /// "Information Technology" mirrors "Technology" so GICS-labelled files
    /// resolve to the same coefficient.
    fn default() -> Self {
        let coefficients = [
            ("Energy", 1.0),
            ("Utilities", 0.8),
            ("Materials", 0.8),
            ("Industrials", 0.6),
            ("Technology", 0.6),
            ("Information Technology", 0.6),
            ("Consumer Discretionary", 0.4),
            ("Consumer Staples", 0.4),
            ("Financials", 0.2),
            ("Health Care", 0.2),
            ("Real Estate", 0.2),
            ("Communication Services", 0.2),
            (UNKNOWN_SECTOR, 0.0),
        ]
        .into_iter()
        .map(|(sector, c)| (sector.to_string(), c))
        .collect();

        Self {
            name: default_name(),
            coefficients,
        }
    }
}
