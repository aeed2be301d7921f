//! Chart selection over whole pipeline runs.

use hobart_metrics::{MetricPipeline, PipelineOutput, RawRecord};
use hobart_output::{ChartBook, ChartFormat, ExportFormat, Exporter, ExposureSummary};
use rstest::rstest;

fn run(rows: &[(&str, &str, &str, &str)]) -> PipelineOutput {
    let raw: Vec<RawRecord> = rows
        .iter()
        .map(|(symbol, sector, weight, income)| {
            RawRecord::new(*symbol)
                .sector(*sector)
                .weight(*weight)
                .net_income(*income)
        })
        .collect();
    MetricPipeline::default().run(&raw)
}

#[test]
fn test_profitable_index_has_no_risk_or_legislation_charts() {
    let output = run(&[
        ("AAPL", "Technology", "5", "90"),
        ("JPM", "Financials", "4", "50"),
        ("XOM", "Energy", "3", "30"),
    ]);
    let book = ChartBook::standard(&output, 10, "H.R.1");
    let names: Vec<&str> = book.charts().iter().map(|c| c.name.as_str()).collect();

    assert!(!names.iter().any(|n| n.contains("Risk")));
    assert!(!names.iter().any(|n| n.starts_with("Top3_Legislation")));
    assert!(!names.iter().any(|n| n.contains("Losses")));
    assert!(names.contains(&"Top10_Companies_Weight"));
    assert!(names.contains(&"Top10_Sectors_NetIncome"));
    assert!(names.contains(&"Legislation_Impact_By_Sector"));
    assert!(book.get("Top10_Sectors_LegislationImpact").is_none());
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(10)]
fn test_top_n_bounds_bar_count(#[case] top_n: usize) {
    let output = run(&[
        ("A", "Energy", "1", "-1"),
        ("B", "Energy", "2", "-2"),
        ("C", "Utilities", "3", "-3"),
        ("D", "Materials", "4", "-4"),
    ]);
    let book = ChartBook::standard(&output, top_n, "H.R.1");

    for chart in book.charts() {
        assert!(!chart.is_empty());
        if chart.name.starts_with(&format!("Top{top_n}_")) {
            assert!(chart.len() <= top_n, "{} has {} bars", chart.name, chart.len());
        }
    }
    let risk = book.get(&format!("Top{top_n}_Companies_Risk")).unwrap();
    assert_eq!(risk.bars[0].label, "D");
}

#[test]
fn test_per_sector_breakdown_keeps_three() {
    let output = run(&[
        ("A", "Energy", "1", "-1"),
        ("B", "Energy", "2", "-2"),
        ("C", "Energy", "3", "-3"),
        ("D", "Energy", "4", "-4"),
    ]);
    let book = ChartBook::standard(&output, 10, "H.R.1");
    let top3 = book.get("Top3_Risk_Energy").unwrap();
    let labels: Vec<&str> = top3.bars.iter().map(|b| b.label.as_str()).collect();

    assert_eq!(labels, vec!["D", "C", "B"]);
}

#[test]
fn test_analysis_outputs_on_disk() {
    let output = run(&[
        ("XOM", "Energy", "0.6", "-100"),
        ("MSFT", "Technology", "0.4", "200"),
    ]);
    let dir = std::env::temp_dir().join(format!("hobart_output_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let csv_path = dir.join("SP500_with_Legislation_Impact.csv");
    output
        .records
        .export_to_file(&csv_path, ExportFormat::Csv)
        .unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.lines().nth(1).unwrap().ends_with(",1.0,60.0,1.0"));

    let written = ChartBook::standard(&output, 10, "H.R.1")
        .write_to_dir(&dir.join("charts"), ChartFormat::Text)
        .unwrap();
    assert!(written.iter().all(|p| p.extension().unwrap() == "txt"));

    let summary = ExposureSummary::from_output(&output, "H.R.1");
    assert_eq!(summary.exposed_companies, 1);
    assert_eq!(summary.affected_sectors, vec!["Energy"]);

    std::fs::remove_dir_all(dir).ok();
}
