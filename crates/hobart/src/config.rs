//! Analysis configuration.

use crate::error::Result;
use hobart_metrics::{ExposureTable, ImpactBasis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for an [`Analysis`](crate::Analysis).
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Entries per top-N ranking (default: 10)
    pub top_n: usize,
    /// Companies per sector in the per-sector breakdowns (default: 3)
    pub per_sector_top: usize,
    /// Sector exposure coefficients (default: H.R.1 table)
    pub exposure: ExposureTable,
    /// Which companies carry legislation impact (default: losses only)
    pub impact_basis: ImpactBasis,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            per_sector_top: 3,
            exposure: ExposureTable::default(),
            impact_basis: ImpactBasis::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON and validate its exposure table.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.exposure.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Replace the exposure table.
    pub fn with_exposure(mut self, exposure: ExposureTable) -> Self {
        self.exposure = exposure;
        self
    }

    /// Set the ranking length.
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the impact basis.
    pub const fn with_impact_basis(mut self, basis: ImpactBasis) -> Self {
        self.impact_basis = basis;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HobartError;
    use hobart_metrics::MetricsError;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.per_sector_top, 3);
        assert_eq!(config.impact_basis, ImpactBasis::Losses);
        assert_eq!(config.exposure.coefficient("Energy"), 1.0);
    }

    #[test]
    fn test_partial_json() {
        let config = AnalysisConfig::from_json_str(r#"{"top_n": 5}"#).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.per_sector_top, 3);
        assert_eq!(config.exposure, ExposureTable::default());
    }

    #[test]
    fn test_json_with_table_and_basis() {
        let json = r#"{
            "impact_basis": "net_income",
            "exposure": {"name": "Clean Air Act", "coefficients": {"Utilities": 0.9}}
        }"#;
        let config = AnalysisConfig::from_json_str(json).unwrap();

        assert_eq!(config.impact_basis, ImpactBasis::NetIncome);
        assert_eq!(config.exposure.name, "Clean Air Act");
        assert_eq!(config.exposure.coefficient("Energy"), 0.0);
    }

    #[test]
    fn test_rejects_out_of_range_coefficient() {
        let json = r#"{"exposure": {"coefficients": {"Energy": 1.5}}}"#;
        let err = AnalysisConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            HobartError::Metrics(MetricsError::InvalidCoefficient { .. })
        ));
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::default()
            .with_top_n(3)
            .with_impact_basis(ImpactBasis::NetIncome)
            .with_exposure(ExposureTable::empty("none"));

        assert_eq!(config.top_n, 3);
        assert_eq!(config.impact_basis, ImpactBasis::NetIncome);
        assert!(config.exposure.is_empty());
    }
}
