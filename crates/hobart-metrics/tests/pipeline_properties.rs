//! Integration tests for dataset-wide pipeline invariants.

use approx::assert_relative_eq;
use hobart_metrics::{
    CompanyMetric, ExposureTable, ImpactBasis, MetricPipeline, RawRecord, top_per_sector,
    top_qualifying,
};
use rstest::rstest;

fn row(symbol: &str, sector: Option<&str>, weight: &str, net_income: &str) -> RawRecord {
    let record = RawRecord::new(symbol).weight(weight).net_income(net_income);
    match sector {
        Some(s) => record.sector(s),
        None => record,
    }
}

fn mixed_dataset() -> Vec<RawRecord> {
    vec![
        row("AAPL", Some("Technology"), "7.12%", "$93,736"),
        row("XOM", Some("Energy"), "1.05%", "(1,200)"),
        row("NEE", Some("Utilities"), "0.45%", "N/A"),
        row("PFE", Some("Health Care"), "0.41%", "(2,130)"),
        row("INTC", Some("Technology"), "0.38%", "($16,720)"),
        row("ZZZ", None, "", "(5)"),
        row("LIN", Some("Materials"), "0.71%", "6,199"),
    ]
}

fn profitable_dataset() -> Vec<RawRecord> {
    vec![
        row("AAPL", Some("Technology"), "7.0", "100"),
        row("JPM", Some("Financials"), "1.3", "50"),
        row("XOM", Some("Energy"), "1.0", "0"),
    ]
}

fn zero_weight_dataset() -> Vec<RawRecord> {
    vec![
        row("A", Some("Energy"), "0", "-10"),
        row("B", Some("Energy"), "garbage", "-20"),
    ]
}

fn negative_weight_dataset() -> Vec<RawRecord> {
    vec![
        row("A", Some("Energy"), "1", "-10"),
        row("B", Some("Energy"), "(0.5)", "-100"),
        row("C", Some("Utilities"), "-2", "-50"),
    ]
}

#[rstest]
#[case::mixed(mixed_dataset())]
#[case::profitable(profitable_dataset())]
#[case::zero_weight(zero_weight_dataset())]
#[case::negative_weight(negative_weight_dataset())]
fn test_dataset_invariants(#[case] raw: Vec<RawRecord>) {
    let output = MetricPipeline::default().run(&raw);
    assert_eq!(output.records.len(), raw.len());

    let weight_sum: f64 = output.records.iter().map(|r| r.weight_normalized).sum();
    if output.total_weight == 0.0 {
        assert!(output.records.iter().all(|r| r.weight_normalized == 0.0));
    } else {
        assert_relative_eq!(weight_sum, 1.0, epsilon = 1e-9);
    }

    for record in &output.records {
        assert!(record.risk_score >= 0.0, "{} has negative risk", record.symbol);
        if record.net_income >= 0.0 {
            assert_eq!(record.risk_score, 0.0);
        }
        assert!((0.0..=1.0).contains(&record.legislation_risk_score));
        assert!((0.0..=1.0).contains(&record.sector_legislation_risk));
        assert!(record.weight_normalized.is_finite());
        assert!(record.legislation_impact.is_finite());
    }

    let company_total: usize = output.sectors.iter().map(|s| s.company_count).sum();
    assert_eq!(company_total, raw.len());
}

#[test]
fn test_formatted_cells_are_normalized() {
    let output = MetricPipeline::default().run(&mixed_dataset());

    let aapl = output.company("AAPL").unwrap();
    assert_eq!(aapl.weight, 7.12);
    assert_eq!(aapl.net_income, 93736.0);

    let intc = output.company("INTC").unwrap();
    assert_eq!(intc.net_income, -16720.0);

    let nee = output.company("NEE").unwrap();
    assert_eq!(nee.net_income, 0.0);

    let zzz = output.company("ZZZ").unwrap();
    assert_eq!(zzz.sector, "Unknown");
    assert_eq!(zzz.weight, 0.0);
    assert_eq!(zzz.weight_normalized, 0.0);
    assert_eq!(zzz.sector_legislation_risk, 0.0);
}

#[test]
fn test_largest_impact_scores_one() {
    let output = MetricPipeline::default().run(&mixed_dataset());
    let top = output
        .records
        .iter()
        .max_by(|a, b| a.legislation_impact.total_cmp(&b.legislation_impact))
        .unwrap();
    assert_eq!(top.legislation_risk_score, 1.0);
    assert_eq!(top.legislation_impact, output.max_legislation_impact);
}

#[test]
fn test_runs_are_bit_identical() {
    let raw = mixed_dataset();
    let pipeline = MetricPipeline::default();

    let first = pipeline.run(&raw);
    let second = pipeline.run(&raw);

    for (a, b) in first.records.iter().zip(&second.records) {
        assert_eq!(a.weight_normalized.to_bits(), b.weight_normalized.to_bits());
        assert_eq!(a.risk_score.to_bits(), b.risk_score.to_bits());
        assert_eq!(a.legislation_impact.to_bits(), b.legislation_impact.to_bits());
        assert_eq!(
            a.legislation_risk_score.to_bits(),
            b.legislation_risk_score.to_bits()
        );
    }
    assert_eq!(first, second);
}

#[test]
fn test_all_profitable_yields_no_risk_rankings() {
    let output = MetricPipeline::default().run(&profitable_dataset());

    assert!(top_qualifying(&output.records, CompanyMetric::RiskScore, 10).is_empty());
    assert!(top_qualifying(&output.records, CompanyMetric::LegislationRiskScore, 10).is_empty());
    assert!(top_per_sector(&output.records, CompanyMetric::RiskScore, 3).is_empty());
    assert!(output.records.iter().all(|r| r.legislation_risk_score == 0.0));
}

#[test]
fn test_net_income_basis_on_profitable_dataset() {
    let output = MetricPipeline::new(ExposureTable::default())
        .with_impact_basis(ImpactBasis::NetIncome)
        .run(&profitable_dataset());

    let aapl = output.company("AAPL").unwrap();
    assert_eq!(aapl.legislation_risk_score, 1.0);
    assert_eq!(aapl.risk_score, 0.0);
}
