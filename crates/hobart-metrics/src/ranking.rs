//! Ranked views over pipeline output.
//!
//! Reports and charts consume records already sorted descending by the
//! metric they display. Rankings are stable: ties keep input order.

use crate::record::{CompanyRecord, SectorAggregate};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Company-level metric to rank by.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyMetric {
    /// Raw index weight
    #[display("Weight")]
    Weight,
    /// Net income
    #[display("Net Income")]
    NetIncome,
    /// Loss-weighted risk score
    #[display("Risk Score")]
    RiskScore,
    /// Legislation impact
    #[display("Legislation Impact")]
    LegislationImpact,
    /// Legislation risk score in `[0, 1]`
    #[display("Legislation Risk Score")]
    LegislationRiskScore,
}

impl CompanyMetric {
    /// Read the metric from a record.
    pub const fn value(&self, record: &CompanyRecord) -> f64 {
        match self {
            Self::Weight => record.weight,
            Self::NetIncome => record.net_income,
            Self::RiskScore => record.risk_score,
            Self::LegislationImpact => record.legislation_impact,
            Self::LegislationRiskScore => record.legislation_risk_score,
        }
    }
}

/// Sector-level metric to rank by.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectorMetric {
    /// Sum of normalized weights
    #[display("Total Weight")]
    TotalWeight,
    /// Sum of risk scores
    #[display("Total Risk")]
    TotalRisk,
    /// Sum of net income
    #[display("Total Net Income")]
    TotalNetIncome,
    /// Sum of legislation impact
    #[display("Total Legislation Impact")]
    TotalLegislationImpact,
    /// Mean exposure coefficient
    #[display("Legislation Exposure")]
    LegislationExposure,
    /// Number of companies
    #[display("Company Count")]
    CompanyCount,
}

impl SectorMetric {
    /// Read the metric from an aggregate.
    pub const fn value(&self, aggregate: &SectorAggregate) -> f64 {
        match self {
            Self::TotalWeight => aggregate.total_weight,
            Self::TotalRisk => aggregate.total_risk,
            Self::TotalNetIncome => aggregate.total_net_income,
            Self::TotalLegislationImpact => aggregate.total_legislation_impact,
            Self::LegislationExposure => aggregate.legislation_exposure,
            Self::CompanyCount => aggregate.company_count as f64,
        }
    }
}

fn sorted_desc<'a, T>(items: impl Iterator<Item = &'a T>, key: impl Fn(&T) -> f64) -> Vec<&'a T>
where
    T: 'a,
{
    let mut ranked: Vec<&T> = items.collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked
}

/// Top `n` companies by a metric, descending.
pub fn top_companies(
    records: &[CompanyRecord],
    metric: CompanyMetric,
    n: usize,
) -> Vec<&CompanyRecord> {
    let mut ranked = sorted_desc(records.iter(), |r| metric.value(r));
    ranked.truncate(n);
    ranked
}

/// Top `n` companies whose metric is strictly positive, descending.
///
/// Empty when no company qualifies.
pub fn top_qualifying(
    records: &[CompanyRecord],
    metric: CompanyMetric,
    n: usize,
) -> Vec<&CompanyRecord> {
    let mut ranked = sorted_desc(
        records.iter().filter(|r| metric.value(r) > 0.0),
        |r| metric.value(r),
    );
    ranked.truncate(n);
    ranked
}

/// The `n` largest losses, most negative net income first.
pub fn largest_losses(records: &[CompanyRecord], n: usize) -> Vec<&CompanyRecord> {
    let mut ranked: Vec<&CompanyRecord> = records.iter().filter(|r| r.is_loss()).collect();
    ranked.sort_by(|a, b| a.net_income.total_cmp(&b.net_income));
    ranked.truncate(n);
    ranked
}

/// Top `n` sectors by a metric, descending.
pub fn top_sectors(
    sectors: &[SectorAggregate],
    metric: SectorMetric,
    n: usize,
) -> Vec<&SectorAggregate> {
    let mut ranked = sorted_desc(sectors.iter(), |s| metric.value(s));
    ranked.truncate(n);
    ranked
}

/// For every sector, its top `k` companies with a strictly positive metric.
///
/// Sectors without a qualifying company are left out. Keys are sector names
/// in lexical order.
pub fn top_per_sector(
    records: &[CompanyRecord],
    metric: CompanyMetric,
    k: usize,
) -> BTreeMap<&str, Vec<&CompanyRecord>> {
    let mut groups: BTreeMap<&str, Vec<&CompanyRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| metric.value(r) > 0.0) {
        groups.entry(record.sector.as_str()).or_default().push(record);
    }

    for ranked in groups.values_mut() {
        ranked.sort_by(|a, b| metric.value(b).total_cmp(&metric.value(a)));
        ranked.truncate(k);
    }

    groups
}
