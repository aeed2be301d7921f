//! Reading delimited files into string-typed DataFrames.

use crate::columns::canonical_headers;
use crate::error::{DataError, Result};
use csv::ReaderBuilder;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Options for reading a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Field delimiter (default: `,`)
    pub delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Read a comma-separated file with default options.
pub fn read_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    read_table_with(path, TableOptions::default())
}

/// Read a delimited file into a DataFrame of optional strings.
///
/// Headers go through [`canonical_headers`]. Cells are trimmed and blank
/// cells become null; rows shorter than the header are padded with nulls and
/// extra trailing cells are ignored. No numeric conversion happens here.
pub fn read_table_with(path: impl AsRef<Path>, options: TableOptions) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DataError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(options.delimiter)
        .from_path(path)?;

    let headers = canonical_headers(rdr.headers()?.iter());
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for result in rdr.records() {
        let record = result?;
        for (i, column) in cells.iter_mut().enumerate() {
            let cell = record
                .get(i)
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            column.push(cell);
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name.as_str().into(), values))
        .collect();
    let df = DataFrame::new(columns)?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );

    Ok(df)
}

/// Header names of a frame, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Whether the frame has a column with this exact name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Optional-string values of a column, `None` if the column is absent.
pub(crate) fn string_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    if !has_column(df, name) {
        return Ok(None);
    }
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hobart_table_{}_{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_table_normalizes_headers() {
        let path = temp_csv(
            "headers.csv",
            "#,Company,Symbol,Weight,Net Income\n1,Apple Inc.,AAPL,7.1%,\"$93,736\"\n",
        );
        let df = read_table(&path).unwrap();

        assert_eq!(
            column_names(&df),
            vec!["#", "Company", "Symbol", "Weight", "Net_Income"]
        );
        let income = string_values(&df, "Net_Income").unwrap().unwrap();
        assert_eq!(income, vec![Some("$93,736".to_string())]);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_blank_and_missing_cells_are_null() {
        let path = temp_csv("ragged.csv", "Symbol,Sector,Weight\nAAPL, ,1.0\nMSFT\n");
        let df = read_table(&path).unwrap();

        assert_eq!(df.height(), 2);
        let sectors = string_values(&df, "Sector").unwrap().unwrap();
        assert_eq!(sectors, vec![None, None]);
        let weights = string_values(&df, "Weight").unwrap().unwrap();
        assert_eq!(weights, vec![Some("1.0".to_string()), None]);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_semicolon_delimiter() {
        let path = temp_csv("semicolon.csv", "Symbol;Weight\nAAPL;7,1\n");
        let df = read_table_with(&path, TableOptions { delimiter: b';' }).unwrap();

        let weights = string_values(&df, "Weight").unwrap().unwrap();
        assert_eq!(weights, vec![Some("7,1".to_string())]);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = read_table("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    #[test]
    fn test_absent_column() {
        let path = temp_csv("absent.csv", "Symbol\nAAPL\n");
        let df = read_table(&path).unwrap();
        assert!(string_values(&df, "Sector").unwrap().is_none());
        fs::remove_file(path).ok();
    }
}
