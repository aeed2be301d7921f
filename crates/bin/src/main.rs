//! Hobart CLI binary.
//!
//! Provides command-line interface for sector and legislative risk analysis
//! of S&P 500 composition files.

use clap::{Parser, Subcommand};
use hobart::data::{Loader, Source, clean_table};
use hobart::metrics::{
    CompanyMetric, CompanyRecord, ExposureTable, ImpactBasis, SectorAggregate, largest_losses,
    top_companies, top_qualifying,
};
use hobart::output::{ChartBook, ChartFormat};
use hobart::{Analysis, AnalysisConfig, AnalysisResult};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: sector and legislative risk analytics for the S&P 500", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Analysis configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the legislative risk analysis on a composition file
    Analyze {
        /// Composition CSV (symbol, company, sector, weight, net income)
        input: PathBuf,

        /// Stock performance CSV to left-join on Symbol
        #[arg(long)]
        performance: Option<PathBuf>,

        /// Sector exposure table (JSON)
        #[arg(long)]
        exposure_table: Option<PathBuf>,

        /// Entries per ranking
        #[arg(long)]
        top: Option<usize>,

        /// Apply legislation impact to profitable companies too
        #[arg(long)]
        include_profits: bool,

        /// Write enriched records here (.csv or .json)
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write charts into this directory
        #[arg(long)]
        charts: Option<PathBuf>,

        /// Chart file format (text or json)
        #[arg(long, default_value = "text")]
        chart_format: String,

        /// Output format (text, markdown or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Rank companies by weight, net income, losses and risk
    Rank {
        /// Index composition CSV
        #[arg(long)]
        composition: PathBuf,

        /// Stock performance CSV
        #[arg(long)]
        performance: PathBuf,

        /// Entries per ranking
        #[arg(long, default_value = "10")]
        top: usize,

        /// Write charts into this directory
        #[arg(long)]
        charts: Option<PathBuf>,

        /// Chart file format (text or json)
        #[arg(long, default_value = "text")]
        chart_format: String,
    },

    /// Clean a raw composition file
    Clean {
        /// Raw composition CSV
        input: PathBuf,

        /// Write the cleaned table here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the sector exposure table
    Exposure {
        /// Sector exposure table (JSON); defaults to H.R.1
        #[arg(long)]
        exposure_table: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins unless `-v` asks for debug output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    debug!(
        top_n = config.top_n,
        impact_basis = ?config.impact_basis,
        "configuration loaded"
    );

    match cli.command {
        Commands::Analyze {
            input,
            performance,
            exposure_table,
            top,
            include_profits,
            export,
            charts,
            chart_format,
            format,
        } => {
            let mut config = config;
            if let Some(path) = exposure_table {
                config = config.with_exposure(ExposureTable::load(path)?);
            }
            if let Some(n) = top {
                config = config.with_top_n(n);
            }
            if include_profits {
                config = config.with_impact_basis(ImpactBasis::NetIncome);
            }
            let source = match performance {
                Some(performance) => Source::Merged {
                    composition: input,
                    performance,
                },
                None => Source::Single(input),
            };
            let chart_format: ChartFormat = chart_format.parse()?;

            let result = Analysis::new(config).run(&source)?;
            match format.as_str() {
                "json" => println!("{}", result.report()?.to_json()?),
                "markdown" => print_markdown(&result),
                _ => print_analysis(&result),
            }

            if let Some(path) = export {
                result.export(&path)?;
                println!("Exported {} companies to {}", result.output.len(), path.display());
            }
            if let Some(dir) = charts {
                let written = result.charts().write_to_dir(&dir, chart_format)?;
                println!("Saved {} charts to {}", written.len(), dir.display());
            }
        }
        Commands::Rank {
            composition,
            performance,
            top,
            charts,
            chart_format,
        } => {
            let chart_format: ChartFormat = chart_format.parse()?;
            rank_companies(config, composition, performance, top, charts, chart_format)?;
        }
        Commands::Clean { input, output } => {
            clean_file(&input, output.as_deref())?;
        }
        Commands::Exposure {
            exposure_table,
            format,
        } => {
            let table = match exposure_table {
                Some(path) => ExposureTable::load(path)?,
                None => config.exposure,
            };
            if format == "json" {
                println!("{}", table.to_json()?);
            } else {
                print_exposure_table(&table);
            }
        }
    }

    Ok(())
}

fn print_banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", title);
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

fn print_analysis(result: &AnalysisResult) {
    print_banner(&format!("LEGISLATIVE RISK ANALYSIS: {}", result.legislation));
    println!("Source: {}", result.source);
    println!("Companies: {}", result.output.len());

    print!("{}", result.summary.to_ascii_table());

    print_sector_table(&result.output.sectors);

    let top = result.top_legislation_risk();
    if top.is_empty() {
        println!("\nNo company carries legislative impact.");
    } else {
        print_company_table(
            &format!("Top {} by Legislation Risk Score", top.len()),
            &top,
            CompanyMetric::LegislationRiskScore,
        );
    }
}

fn print_markdown(result: &AnalysisResult) {
    print!("{}", result.summary.to_markdown());

    println!("\n## Sector Aggregates\n");
    println!("| Sector | Companies | Weight | Net Income | Risk | Exposure | Impact |");
    println!("|--------|-----------|--------|------------|------|----------|--------|");
    for s in &result.output.sectors {
        println!(
            "| {} | {} | {:.4} | {:.2} | {:.4} | {:.3} | {:.4} |",
            s.sector,
            s.company_count,
            s.total_weight,
            s.total_net_income,
            s.total_risk,
            s.legislation_exposure,
            s.total_legislation_impact
        );
    }

    let top = result.top_legislation_risk();
    if !top.is_empty() {
        println!("\n## Top {} by Legislation Risk Score\n", top.len());
        println!("| Symbol | Company | Sector | Score |");
        println!("|--------|---------|--------|-------|");
        for r in top {
            println!(
                "| {} | {} | {} | {:.4} |",
                r.symbol,
                r.display_name(),
                r.sector,
                r.legislation_risk_score
            );
        }
    }
}

fn print_sector_table(sectors: &[SectorAggregate]) {
    println!("\nSector Aggregates:");
    println!("{}", "-".repeat(110));
    println!(
        "{:<28} {:>5} {:>10} {:>16} {:>14} {:>10} {:>14}",
        "Sector", "N", "Weight", "Net Income", "Risk", "Exposure", "Impact"
    );
    println!("{}", "-".repeat(110));
    for s in sectors {
        println!(
            "{:<28} {:>5} {:>10.4} {:>16.2} {:>14.4} {:>10.3} {:>14.4}",
            s.sector,
            s.company_count,
            s.total_weight,
            s.total_net_income,
            s.total_risk,
            s.legislation_exposure,
            s.total_legislation_impact
        );
    }
}

fn print_company_table(title: &str, records: &[&CompanyRecord], metric: CompanyMetric) {
    println!("\n=== {} ===", title);
    println!(
        "{:<8} {:<32} {:<24} {:>16}",
        "Symbol",
        "Company",
        "Sector",
        metric.to_string()
    );
    println!("{}", "-".repeat(83));
    for r in records {
        println!(
            "{:<8} {:<32} {:<24} {:>16.4}",
            r.symbol,
            r.display_name(),
            r.sector,
            metric.value(r)
        );
    }
}

fn rank_companies(
    config: AnalysisConfig,
    composition: PathBuf,
    performance: PathBuf,
    top: usize,
    charts: Option<PathBuf>,
    chart_format: ChartFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = Source::Merged {
        composition,
        performance,
    };
    let raw = Loader::new().load(&source)?;
    let pipeline = Analysis::new(config).pipeline();
    let output = pipeline.run(&raw);
    let records = &output.records;

    print_banner("S&P 500 COMPANY RANKINGS");

    let rankings = [
        (
            format!("Top {top} by Weight"),
            top_companies(records, CompanyMetric::Weight, top),
            CompanyMetric::Weight,
        ),
        (
            format!("Top {top} by Net Income"),
            top_companies(records, CompanyMetric::NetIncome, top),
            CompanyMetric::NetIncome,
        ),
        (
            format!("Top {top} Losses"),
            largest_losses(records, top),
            CompanyMetric::NetIncome,
        ),
        (
            format!("Top {top} by Risk Score"),
            top_qualifying(records, CompanyMetric::RiskScore, top),
            CompanyMetric::RiskScore,
        ),
    ];
    for (title, ranked, metric) in &rankings {
        if ranked.is_empty() {
            println!("\n=== {} ===\n  (none)", title);
        } else {
            print_company_table(title, ranked, *metric);
        }
    }

    if let Some(dir) = charts {
        let written = ChartBook::companies(&output, top).write_to_dir(&dir, chart_format)?;
        println!("\nSaved {} charts to {}", written.len(), dir.display());
    }

    Ok(())
}

fn clean_file(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let table = clean_table(input)?;

    println!("Original columns:");
    println!("  {:?}\n", table.original_columns);

    println!("Cleaned columns:");
    for (name, dtype) in table.dtypes() {
        println!("  {:<24} {}", name, dtype);
    }

    println!("\nRows: {}", table.height());
    println!("Sum of weights: {:.4}", table.weight_sum()?);

    println!("\nCompanies per sector:");
    for (sector, count) in table.sector_counts()? {
        println!("  {:<32} {:>5}", sector, count);
    }

    if let Some(path) = output {
        table.write_csv(path)?;
        println!("\nCleaned file saved to: {}", path.display());
    }

    Ok(())
}

fn print_exposure_table(table: &ExposureTable) {
    println!("\nSector exposure: {}", table.name);
    println!("{}", "=".repeat(50));
    println!("{:<36} {:>12}", "Sector", "Coefficient");
    println!("{}", "-".repeat(50));
    for (sector, coefficient) in table.ranked() {
        println!("{:<36} {:>12.2}", sector, coefficient);
    }
    println!("{}", "=".repeat(50));
    println!("Sectors not listed have coefficient 0.");
}
