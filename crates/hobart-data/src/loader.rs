//! Composition loading and merging.
//!
//! One loader serves both layouts seen in practice: a single pre-merged file
//! carrying sector, weight and net income, or a composition file joined with
//! a separate stock-performance file on `Symbol`.

use crate::columns::Field;
use crate::error::{DataError, Result};
use crate::table::{TableOptions, has_column, read_table_with, string_values};
use hobart_metrics::RawRecord;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix polars gives right-hand columns that clash on a join.
const RIGHT_SUFFIX: &str = "_right";

/// Where the composition data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// One file with every required column.
    Single(PathBuf),
    /// Composition file left-joined with a performance file on `Symbol`.
    Merged {
        /// Index composition (symbol, company, weight, sector).
        composition: PathBuf,
        /// Stock performance (symbol, net income, prices).
        performance: PathBuf,
    },
}

impl Source {
    /// Path used in error messages.
    pub fn primary_path(&self) -> &Path {
        match self {
            Self::Single(path) => path,
            Self::Merged { composition, .. } => composition,
        }
    }
}

/// Loads raw records for the metric pipeline.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: TableOptions,
}

impl Loader {
    /// Loader with default CSV options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with custom CSV options.
    pub const fn with_options(options: TableOptions) -> Self {
        Self { options }
    }

    /// Load a source into a frame with canonical columns.
    pub fn load_frame(&self, source: &Source) -> Result<DataFrame> {
        match source {
            Source::Single(path) => read_table_with(path, self.options),
            Source::Merged {
                composition,
                performance,
            } => {
                let left = read_table_with(composition, self.options)?;
                let right = read_table_with(performance, self.options)?;
                merge_on_symbol(left, right, composition, performance)
            }
        }
    }

    /// Load a source into raw records.
    pub fn load(&self, source: &Source) -> Result<Vec<RawRecord>> {
        let df = self.load_frame(source)?;
        records_from_frame(&df, source.primary_path())
    }
}

/// Load a single pre-merged file.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    Loader::new().load(&Source::Single(path.as_ref().to_path_buf()))
}

/// Load a composition file left-joined with a performance file.
pub fn load_merged(
    composition: impl AsRef<Path>,
    performance: impl AsRef<Path>,
) -> Result<Vec<RawRecord>> {
    Loader::new().load(&Source::Merged {
        composition: composition.as_ref().to_path_buf(),
        performance: performance.as_ref().to_path_buf(),
    })
}

/// Left-join two frames on `Symbol`; every composition row is kept.
pub fn merge_on_symbol(
    composition: DataFrame,
    performance: DataFrame,
    composition_path: &Path,
    performance_path: &Path,
) -> Result<DataFrame> {
    let key = Field::Symbol.column();
    for (df, path) in [
        (&composition, composition_path),
        (&performance, performance_path),
    ] {
        if !has_column(df, key) {
            return Err(DataError::MissingColumn {
                column: key.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    let rows = composition.height();
    let merged = composition
        .lazy()
        .join(
            performance.lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    if merged.height() != rows {
        warn!(
            composition_rows = rows,
            merged_rows = merged.height(),
            "performance file repeats symbols; merged rows were duplicated"
        );
    }
    debug!(rows = merged.height(), columns = merged.width(), "merged composition with performance");

    Ok(merged)
}

/// Values of a canonical field, preferring the composition side of a merge
/// and falling back to the performance side cell by cell.
fn field_values(df: &DataFrame, field: Field) -> Result<Option<Vec<Option<String>>>> {
    let name = field.column();
    let left = string_values(df, name)?;
    let right = string_values(df, &format!("{name}{RIGHT_SUFFIX}"))?;

    Ok(match (left, right) {
        (Some(left), Some(right)) => Some(
            left.into_iter()
                .zip(right)
                .map(|(l, r)| l.or(r))
                .collect(),
        ),
        (left, right) => left.or(right),
    })
}

/// Extract raw records from a frame with canonical columns.
///
/// `Symbol`, `Weight` and `Net_Income` are required; `Company` and `Sector`
/// are optional. Rows without a symbol are skipped.
pub fn records_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<RawRecord>> {
    let required = |field: Field| -> Result<Vec<Option<String>>> {
        field_values(df, field)?.ok_or_else(|| DataError::MissingColumn {
            column: field.column().to_string(),
            path: path.to_path_buf(),
        })
    };

    let symbols = required(Field::Symbol)?;
    let weights = required(Field::Weight)?;
    let incomes = required(Field::NetIncome)?;
    let height = df.height();
    let companies = field_values(df, Field::Company)?.unwrap_or_else(|| vec![None; height]);
    let sectors = field_values(df, Field::Sector)?.unwrap_or_else(|| vec![None; height]);

    let mut records = Vec::with_capacity(height);
    let mut skipped = 0usize;

    for ((((symbol, company_name), sector), weight), net_income) in symbols
        .into_iter()
        .zip(companies)
        .zip(sectors)
        .zip(weights)
        .zip(incomes)
    {
        let Some(symbol) = symbol else {
            skipped += 1;
            continue;
        };
        records.push(RawRecord {
            symbol,
            company_name,
            sector,
            weight,
            net_income,
        });
    }

    if skipped > 0 {
        warn!(skipped, path = %path.display(), "rows without a symbol were skipped");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        let columns = columns
            .into_iter()
            .map(|(name, values)| {
                let values: Vec<Option<String>> =
                    values.into_iter().map(|v| v.map(str::to_string)).collect();
                Column::new(name.into(), values)
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_records_from_frame() {
        let df = frame(vec![
            ("Symbol", vec![Some("AAPL"), None, Some("XOM")]),
            ("Weight", vec![Some("7.1%"), Some("1"), None]),
            ("Net_Income", vec![Some("$93,736"), Some("2"), Some("(5)")]),
            ("Sector", vec![Some("Technology"), None, Some("Energy")]),
        ]);
        let records = records_from_frame(&df, Path::new("test.csv")).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "AAPL");
        assert_eq!(records[0].company_name, None);
        assert_eq!(records[0].weight.as_deref(), Some("7.1%"));
        assert_eq!(records[1].symbol, "XOM");
        assert_eq!(records[1].weight, None);
        assert_eq!(records[1].sector.as_deref(), Some("Energy"));
    }

    #[test]
    fn test_records_from_frame_missing_column() {
        let df = frame(vec![
            ("Symbol", vec![Some("AAPL")]),
            ("Weight", vec![Some("1")]),
        ]);
        let err = records_from_frame(&df, Path::new("test.csv")).unwrap_err();
        match err {
            DataError::MissingColumn { column, .. } => assert_eq!(column, "Net_Income"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_keeps_all_composition_rows() {
        let composition = frame(vec![
            ("Symbol", vec![Some("AAPL"), Some("MSFT"), Some("NEW")]),
            ("Company", vec![Some("Apple"), Some("Microsoft"), None]),
            ("Weight", vec![Some("7"), Some("6"), Some("0.1")]),
        ]);
        let performance = frame(vec![
            ("Symbol", vec![Some("MSFT"), Some("AAPL"), Some("ZZZ")]),
            ("Company", vec![Some("Microsoft Corp"), Some("Apple Inc"), Some("Z")]),
            ("Net_Income", vec![Some("88"), Some("94"), Some("1")]),
        ]);

        let merged =
            merge_on_symbol(composition, performance, Path::new("c.csv"), Path::new("p.csv"))
                .unwrap();
        assert_eq!(merged.height(), 3);

        let mut records = records_from_frame(&merged, Path::new("c.csv")).unwrap();
        records.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        assert_eq!(records[0].symbol, "AAPL");
        assert_eq!(records[0].company_name.as_deref(), Some("Apple"));
        assert_eq!(records[0].net_income.as_deref(), Some("94"));
        assert_eq!(records[2].symbol, "NEW");
        assert_eq!(records[2].net_income, None);
    }

    #[test]
    fn test_merge_requires_symbol() {
        let composition = frame(vec![("Ticker", vec![Some("AAPL")])]);
        let performance = frame(vec![("Symbol", vec![Some("AAPL")])]);
        let err =
            merge_on_symbol(composition, performance, Path::new("c.csv"), Path::new("p.csv"))
                .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }
}
