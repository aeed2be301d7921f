//! Cleaning a raw composition file into a normalized table.
//!
//! The cleaned table keeps every input column, drops the row-number column
//! (`#`), converts `Weight` and `Net_Income` to numbers (malformed cells
//! become 0) and fills missing sectors with `"Unknown"`.

use crate::columns::Field;
use crate::error::{DataError, Result};
use crate::table::{TableOptions, column_names, has_column, read_table_with, string_values};
use hobart_metrics::{UNKNOWN_SECTOR, numeric_or_zero};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Columns removed by cleaning.
const DROPPED_COLUMNS: [&str; 1] = ["#"];

/// Read and clean a comma-separated composition file.
pub fn clean_table(path: impl AsRef<Path>) -> Result<CleanTable> {
    CleanTable::load(path)
}

/// A composition table after cleaning.
#[derive(Debug, Clone)]
pub struct CleanTable {
    /// File the table was read from.
    pub source: PathBuf,
    /// Column names as they appeared in the file.
    pub original_columns: Vec<String>,
    /// Cleaned data.
    pub frame: DataFrame,
}

impl CleanTable {
    /// Read and clean a file with default CSV options.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, TableOptions::default())
    }

    /// Read and clean a file.
    pub fn load_with(path: impl AsRef<Path>, options: TableOptions) -> Result<Self> {
        let path = path.as_ref();
        let original_columns = raw_headers(path, options)?;
        let mut frame = read_table_with(path, options)?;

        for name in DROPPED_COLUMNS {
            if has_column(&frame, name) {
                frame = frame.drop(name)?;
            }
        }

        for field in [Field::Weight, Field::NetIncome] {
            let name = field.column();
            let values = string_values(&frame, name)?.ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })?;
            let numbers: Vec<f64> = values
                .iter()
                .map(|cell| numeric_or_zero(cell.as_deref()))
                .collect();
            frame.with_column(Column::new(name.into(), numbers))?;
        }

        let sector = Field::Sector.column();
        if let Some(values) = string_values(&frame, sector)? {
            let filled: Vec<String> = values
                .into_iter()
                .map(|cell| cell.unwrap_or_else(|| UNKNOWN_SECTOR.to_string()))
                .collect();
            frame.with_column(Column::new(sector.into(), filled))?;
        }

        Ok(Self {
            source: path.to_path_buf(),
            original_columns,
            frame,
        })
    }

    /// Column names after cleaning.
    pub fn columns(&self) -> Vec<String> {
        column_names(&self.frame)
    }

    /// Column names paired with their data type.
    pub fn dtypes(&self) -> Vec<(String, String)> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.dtype().to_string()))
            .collect()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Sum of the cleaned `Weight` column (close to 1 or 100 for a full index).
    pub fn weight_sum(&self) -> Result<f64> {
        Ok(self
            .frame
            .column(Field::Weight.column())?
            .f64()?
            .sum()
            .unwrap_or(0.0))
    }

    /// Companies per sector, most populated first, ties by name.
    ///
    /// Empty when the table has no `Sector` column.
    pub fn sector_counts(&self) -> Result<Vec<(String, usize)>> {
        let Some(sectors) = string_values(&self.frame, Field::Sector.column())? else {
            return Ok(Vec::new());
        };

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for sector in sectors.into_iter().flatten() {
            *counts.entry(sector).or_insert(0) += 1;
        }

        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }

    /// Write the cleaned table as CSV.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut wtr = csv::Writer::from_writer(File::create(path)?);
        wtr.write_record(self.columns())?;

        let columns = self.frame.get_columns();
        for row in 0..self.frame.height() {
            let cells = columns
                .iter()
                .map(|column| -> Result<String> { Ok(cell_text(&column.get(row)?)) })
                .collect::<Result<Vec<String>>>()?;
            wtr.write_record(&cells)?;
        }
        wtr.flush()?;

        info!(path = %path.display(), rows = self.frame.height(), "wrote cleaned table");
        Ok(())
    }
}

fn cell_text(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn raw_headers(path: &Path, options: TableOptions) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(DataError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_path(path)?;
    Ok(rdr.headers()?.iter().map(str::to_string).collect())
}
