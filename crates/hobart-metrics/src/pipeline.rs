//! Metric derivation pipeline.
//!
//! Turns raw composition rows into [`CompanyRecord`]s and per-sector
//! [`SectorAggregate`]s. Every stage is a public function so callers can run
//! a single step in isolation; [`MetricPipeline::run`] chains them.
//!
//! Two stages depend on a dataset-wide figure and therefore need a completed
//! scan first: weight normalization (total weight) and legislation score
//! normalization (maximum impact).

use crate::exposure::{ExposureTable, UNKNOWN_SECTOR};
use crate::numeric::numeric_or_zero;
use crate::record::{CleanRecord, CompanyRecord, RawRecord, SectorAggregate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Which companies carry a legislation impact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactBasis {
    /// Only loss-making companies are exposed; profitable ones score 0.
    #[default]
    Losses,
    /// Every company is exposed in proportion to its absolute net income.
    NetIncome,
}

/// Derives company and sector metrics using a fixed exposure table.
#[derive(Debug, Clone, Default)]
pub struct MetricPipeline {
    exposure: ExposureTable,
    impact_basis: ImpactBasis,
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Enriched companies, in input order.
    pub records: Vec<CompanyRecord>,
    /// Sector aggregates, ordered by sector name.
    pub sectors: Vec<SectorAggregate>,
    /// Sum of raw weights before normalization.
    pub total_weight: f64,
    /// Largest legislation impact across all companies.
    pub max_legislation_impact: f64,
}

impl PipelineOutput {
    /// Number of companies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the run had no input rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of companies reporting a loss.
    pub fn loss_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_loss()).count()
    }

    /// Aggregate for a single sector.
    pub fn sector(&self, name: &str) -> Option<&SectorAggregate> {
        self.sectors.iter().find(|s| s.sector == name)
    }

    /// Company by symbol.
    pub fn company(&self, symbol: &str) -> Option<&CompanyRecord> {
        self.records.iter().find(|r| r.symbol == symbol)
    }
}

impl MetricPipeline {
    /// Create a pipeline around an exposure table.
    pub const fn new(exposure: ExposureTable) -> Self {
        Self {
            exposure,
            impact_basis: ImpactBasis::Losses,
        }
    }

    /// Choose which companies carry a legislation impact.
    pub const fn with_impact_basis(mut self, basis: ImpactBasis) -> Self {
        self.impact_basis = basis;
        self
    }

    /// Impact basis in use.
    pub const fn impact_basis(&self) -> ImpactBasis {
        self.impact_basis
    }

    /// Exposure table in use.
    pub const fn exposure(&self) -> &ExposureTable {
        &self.exposure
    }

    /// Run every stage over the raw rows.
    pub fn run(&self, raw: &[RawRecord]) -> PipelineOutput {
        warn_on_duplicate_symbols(raw);

        let clean = fill_defaults(raw);
        let total_weight: f64 = clean.iter().map(|r| r.weight).sum();
        let normalized = compute_weight_normalized(&clean);

        let partial: Vec<(f64, f64, f64)> = clean
            .iter()
            .zip(&normalized)
            .map(|(record, &weight_normalized)| {
                let risk_score = compute_risk_score(weight_normalized, record.net_income);
                let (sector_risk, impact) = compute_legislation_fields(
                    &record.sector,
                    weight_normalized,
                    record.net_income,
                    &self.exposure,
                    self.impact_basis,
                );
                (risk_score, sector_risk, impact)
            })
            .collect();

        let impacts: Vec<f64> = partial.iter().map(|(_, _, impact)| *impact).collect();
        let max_legislation_impact = impacts.iter().copied().fold(0.0_f64, f64::max);
        let scores = normalize_legislation_risk(&impacts);

        let records: Vec<CompanyRecord> = clean
            .into_iter()
            .zip(normalized)
            .zip(partial)
            .zip(scores)
            .map(
                |(((record, weight_normalized), (risk_score, sector_risk, impact)), score)| {
                    CompanyRecord {
                        symbol: record.symbol,
                        company_name: record.company_name,
                        sector: record.sector,
                        weight: record.weight,
                        net_income: record.net_income,
                        weight_normalized,
                        risk_score,
                        sector_legislation_risk: sector_risk,
                        legislation_impact: impact,
                        legislation_risk_score: score,
                    }
                },
            )
            .collect();

        let sectors = aggregate_by_sector(&records);

        debug!(
            companies = records.len(),
            sectors = sectors.len(),
            total_weight,
            max_legislation_impact,
            legislation = %self.exposure.name,
            "metric pipeline complete"
        );

        PipelineOutput {
            records,
            sectors,
            total_weight,
            max_legislation_impact,
        }
    }
}

fn warn_on_duplicate_symbols(raw: &[RawRecord]) {
    let mut seen = HashSet::with_capacity(raw.len());
    for record in raw {
        if !seen.insert(record.symbol.as_str()) {
            warn!(symbol = %record.symbol, "duplicate symbol in input");
        }
    }
}

/// Normalize numeric cells and fill missing values.
///
/// Missing or malformed weight and net income become `0.0`; a missing or
/// blank sector becomes `"Unknown"`. Negative weights are clamped to `0.0`
/// so risk and impact stay non-negative.
pub fn fill_defaults(raw: &[RawRecord]) -> Vec<CleanRecord> {
    raw.iter()
        .map(|r| CleanRecord {
            symbol: r.symbol.trim().to_string(),
            company_name: r
                .company_name
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            sector: r
                .sector
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_SECTOR)
                .to_string(),
            weight: non_negative_weight(&r.symbol, numeric_or_zero(r.weight.as_deref())),
            net_income: numeric_or_zero(r.net_income.as_deref()),
        })
        .collect()
}

fn non_negative_weight(symbol: &str, weight: f64) -> f64 {
    if weight < 0.0 {
        warn!(symbol = symbol.trim(), weight, "negative weight clamped to 0");
        return 0.0;
    }
    weight
}

/// Divide each weight by the total weight.
///
/// A zero total yields zero for every record instead of NaN.
pub fn compute_weight_normalized(records: &[CleanRecord]) -> Vec<f64> {
    let total: f64 = records.iter().map(|r| r.weight).sum();

    if total == 0.0 {
        if !records.is_empty() {
            warn!("total index weight is zero; normalized weights set to 0");
        }
        return vec![0.0; records.len()];
    }

    records.iter().map(|r| r.weight / total).collect()
}

/// Loss-weighted risk: `weight_normalized * |net_income|` for losses, else 0.
pub fn compute_risk_score(weight_normalized: f64, net_income: f64) -> f64 {
    if net_income < 0.0 {
        -weight_normalized * net_income
    } else {
        0.0
    }
}

/// Sector coefficient and company-level legislation impact.
///
/// Impact is `coefficient * weight_normalized * |net_income|`; under
/// [`ImpactBasis::Losses`] it is 0 for companies with `net_income >= 0`.
/// Returns `(sector_legislation_risk, legislation_impact)`.
pub fn compute_legislation_fields(
    sector: &str,
    weight_normalized: f64,
    net_income: f64,
    table: &ExposureTable,
    basis: ImpactBasis,
) -> (f64, f64) {
    let sector_risk = table.coefficient(sector);
    let exposed = match basis {
        ImpactBasis::Losses => net_income < 0.0,
        ImpactBasis::NetIncome => true,
    };
    let impact = if exposed {
        sector_risk * weight_normalized * net_income.abs()
    } else {
        0.0
    };
    (sector_risk, impact)
}

/// Scale impacts by their maximum so the largest becomes 1.
///
/// When no impact is positive every score is 0.
pub fn normalize_legislation_risk(impacts: &[f64]) -> Vec<f64> {
    let max = impacts.iter().copied().fold(0.0_f64, f64::max);

    if max > 0.0 {
        impacts.iter().map(|impact| impact / max).collect()
    } else {
        vec![0.0; impacts.len()]
    }
}

#[derive(Default)]
struct SectorAccumulator {
    count: usize,
    weight: f64,
    net_income: f64,
    risk: f64,
    exposure: f64,
    impact: f64,
}

/// Group companies by sector and total their metrics in one pass.
///
/// Output is ordered by sector name; presentation layers re-sort as needed.
pub fn aggregate_by_sector(records: &[CompanyRecord]) -> Vec<SectorAggregate> {
    let mut groups: BTreeMap<&str, SectorAccumulator> = BTreeMap::new();

    for record in records {
        let acc = groups.entry(record.sector.as_str()).or_default();
        acc.count += 1;
        acc.weight += record.weight_normalized;
        acc.net_income += record.net_income;
        acc.risk += record.risk_score;
        acc.exposure += record.sector_legislation_risk;
        acc.impact += record.legislation_impact;
    }

    groups
        .into_iter()
        .map(|(sector, acc)| {
            let n = acc.count as f64;
            SectorAggregate {
                sector: sector.to_string(),
                company_count: acc.count,
                total_weight: acc.weight,
                avg_net_income: acc.net_income / n,
                total_net_income: acc.net_income,
                total_risk: acc.risk,
                legislation_exposure: acc.exposure / n,
                total_legislation_impact: acc.impact,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_company_input() -> Vec<RawRecord> {
        vec![
            RawRecord::new("XOM")
                .company_name("Exxon Mobil")
                .sector("Energy")
                .weight("0.6")
                .net_income("-100"),
            RawRecord::new("MSFT")
                .company_name("Microsoft")
                .sector("Technology")
                .weight("0.4")
                .net_income("200"),
        ]
    }

    #[test]
    fn test_two_company_scenario() {
        let output = MetricPipeline::default().run(&two_company_input());
        let xom = output.company("XOM").unwrap();
        let msft = output.company("MSFT").unwrap();

        assert_relative_eq!(xom.weight_normalized, 0.6, epsilon = 1e-12);
        assert_relative_eq!(msft.weight_normalized, 0.4, epsilon = 1e-12);
        assert_relative_eq!(xom.risk_score, 60.0, epsilon = 1e-9);
        assert_eq!(msft.risk_score, 0.0);
        assert_eq!(xom.sector_legislation_risk, 1.0);
        assert_eq!(msft.sector_legislation_risk, 0.6);
        assert_relative_eq!(xom.legislation_impact, 60.0, epsilon = 1e-9);
        assert_eq!(msft.legislation_impact, 0.0);
        assert_eq!(xom.legislation_risk_score, 1.0);
        assert_eq!(msft.legislation_risk_score, 0.0);
        assert_relative_eq!(output.max_legislation_impact, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_net_income_basis_exposes_profits() {
        let output = MetricPipeline::default()
            .with_impact_basis(ImpactBasis::NetIncome)
            .run(&two_company_input());
        let msft = output.company("MSFT").unwrap();

        assert_relative_eq!(msft.legislation_impact, 0.6 * 0.4 * 200.0, epsilon = 1e-9);
        assert_relative_eq!(msft.legislation_risk_score, 48.0 / 60.0, epsilon = 1e-9);
        assert_eq!(msft.risk_score, 0.0);
    }

    #[test]
    fn test_fill_defaults() {
        let raw = vec![
            RawRecord::new(" AAPL "),
            RawRecord::new("XYZ").sector("  ").weight("N/A").net_income("(12)"),
        ];
        let clean = fill_defaults(&raw);

        assert_eq!(clean[0].symbol, "AAPL");
        assert_eq!(clean[0].sector, "Unknown");
        assert_eq!(clean[0].company_name, "");
        assert_eq!(clean[0].weight, 0.0);
        assert_eq!(clean[0].net_income, 0.0);
        assert_eq!(clean[1].sector, "Unknown");
        assert_eq!(clean[1].weight, 0.0);
        assert_eq!(clean[1].net_income, -12.0);
    }

    #[test]
    fn test_negative_weight_clamped() {
        let raw = vec![
            RawRecord::new("A").sector("Energy").weight("1").net_income("-10"),
            RawRecord::new("B").sector("Energy").weight("(0.5)").net_income("-100"),
        ];
        let output = MetricPipeline::default().run(&raw);
        let b = output.company("B").unwrap();

        assert_eq!(b.weight, 0.0);
        assert_eq!(b.weight_normalized, 0.0);
        assert_eq!(b.risk_score, 0.0);
        assert_eq!(b.legislation_risk_score, 0.0);
        assert_eq!(output.company("A").unwrap().legislation_risk_score, 1.0);
    }

    #[test]
    fn test_zero_total_weight() {
        let raw = vec![
            RawRecord::new("A").weight("0").net_income("-5"),
            RawRecord::new("B").weight("bad").net_income("-5"),
        ];
        let output = MetricPipeline::default().run(&raw);

        for record in &output.records {
            assert_eq!(record.weight_normalized, 0.0);
            assert_eq!(record.risk_score, 0.0);
            assert_eq!(record.legislation_risk_score, 0.0);
        }
        assert_eq!(output.total_weight, 0.0);
    }

    #[test]
    fn test_compute_risk_score() {
        assert_eq!(compute_risk_score(0.5, 100.0), 0.0);
        assert_eq!(compute_risk_score(0.5, 0.0), 0.0);
        assert_eq!(compute_risk_score(0.5, -100.0), 50.0);
    }

    #[test]
    fn test_compute_legislation_fields_unknown_sector() {
        let table = ExposureTable::default();
        let (risk, impact) =
            compute_legislation_fields("Shipping", 0.3, -50.0, &table, ImpactBasis::Losses);
        assert_eq!(risk, 0.0);
        assert_eq!(impact, 0.0);
    }

    #[test]
    fn test_compute_legislation_fields_basis() {
        let table = ExposureTable::default();
        let losses = compute_legislation_fields("Utilities", 0.5, 10.0, &table, ImpactBasis::Losses);
        assert_eq!(losses, (0.8, 0.0));

        let all = compute_legislation_fields("Utilities", 0.5, 10.0, &table, ImpactBasis::NetIncome);
        assert_relative_eq!(all.1, 4.0, epsilon = 1e-12);

        let loss = compute_legislation_fields("Utilities", 0.5, -10.0, &table, ImpactBasis::Losses);
        assert_relative_eq!(loss.1, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_legislation_risk() {
        assert_eq!(normalize_legislation_risk(&[2.0, 1.0, 0.0]), vec![1.0, 0.5, 0.0]);
        assert_eq!(normalize_legislation_risk(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(normalize_legislation_risk(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_by_sector() {
        let raw = vec![
            RawRecord::new("XOM").sector("Energy").weight("3").net_income("-30"),
            RawRecord::new("CVX").sector("Energy").weight("1").net_income("10"),
            RawRecord::new("JPM").sector("Financials").weight("4").net_income("50"),
        ];
        let output = MetricPipeline::default().run(&raw);
        assert_eq!(output.sectors.len(), 2);

        let energy = output.sector("Energy").unwrap();
        assert_eq!(energy.company_count, 2);
        assert_relative_eq!(energy.total_weight, 0.5, epsilon = 1e-12);
        assert_relative_eq!(energy.total_net_income, -20.0);
        assert_relative_eq!(energy.avg_net_income, -10.0);
        assert_relative_eq!(energy.total_risk, 0.375 * 30.0, epsilon = 1e-12);
        assert_relative_eq!(energy.legislation_exposure, 1.0);
        assert_relative_eq!(energy.total_legislation_impact, 0.375 * 30.0, epsilon = 1e-12);

        let financials = output.sector("Financials").unwrap();
        assert_eq!(financials.company_count, 1);
        assert_relative_eq!(financials.legislation_exposure, 0.2);
        assert_eq!(financials.total_risk, 0.0);
    }

    #[test]
    fn test_sectors_ordered_by_name() {
        let raw = vec![
            RawRecord::new("A").sector("Utilities").weight("1"),
            RawRecord::new("B").sector("Energy").weight("1"),
            RawRecord::new("C"),
        ];
        let output = MetricPipeline::default().run(&raw);
        let names: Vec<_> = output.sectors.iter().map(|s| s.sector.as_str()).collect();
        assert_eq!(names, vec!["Energy", "Unknown", "Utilities"]);
    }

    #[test]
    fn test_empty_input() {
        let output = MetricPipeline::default().run(&[]);
        assert!(output.is_empty());
        assert!(output.sectors.is_empty());
        assert_eq!(output.loss_count(), 0);
        assert_eq!(output.max_legislation_impact, 0.0);
    }

    #[test]
    fn test_custom_exposure_table() {
        let table = ExposureTable::empty("Test Act")
            .with_override("Technology", 1.0)
            .unwrap();
        let output = MetricPipeline::new(table)
            .with_impact_basis(ImpactBasis::NetIncome)
            .run(&two_company_input());

        assert_eq!(output.company("XOM").unwrap().legislation_impact, 0.0);
        assert_eq!(output.company("MSFT").unwrap().legislation_risk_score, 1.0);
    }
}
