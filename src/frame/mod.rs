//! In-memory tabular frame backed by a Polars `DataFrame`.
//!
//! A [`Frame`] is an ordered set of named, typed columns of equal length.
//! Operations never mutate a frame in place; filtering and filling return a
//! new frame so a failed step leaves its input untouched.

pub mod encoding;

#[cfg(test)]
mod tests;

use crate::constants::{CSV_NULL_MARKERS, DEFAULT_INFER_SCHEMA_LENGTH};
use crate::error::{CleanerError, Result};
use encoding::decode_with_fallback;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Serialized representations a frame can be read from or written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Detect the format from a file name or blob path extension
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                CleanerError::format(format!("'{}' has no file extension (expected .csv or .json)", path))
            })?;
        extension.parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DataFormat::Csv => crate::constants::CSV_CONTENT_TYPE,
            DataFormat::Json => crate::constants::JSON_CONTENT_TYPE,
        }
    }
}

impl FromStr for DataFormat {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            other => Err(CleanerError::format(format!(
                "unsupported format '{}', only csv and json are accepted",
                other
            ))),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Declared scalar kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Boolean,
    Null,
    /// Lists and structs, as read from nested JSON values
    Nested,
}

impl ColumnKind {
    /// Map a Polars dtype onto the frame's column kinds.
    ///
    /// Temporal and categorical dtypes are treated as text.
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            dtype if dtype.is_nested() => ColumnKind::Nested,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Float32 | DataType::Float64 => ColumnKind::Float,
            DataType::Boolean => ColumnKind::Boolean,
            DataType::Null => ColumnKind::Null,
            _ => ColumnKind::Text,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Null => "null",
            ColumnKind::Nested => "nested",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and kind of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

/// Value written into the null cells of a column
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Text(String),
    Integer(i32),
    Boolean(bool),
}

/// Options controlling how raw bytes are parsed
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Rows scanned to infer CSV column kinds
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

/// Tabular frame of named, typed, positionally aligned columns
#[derive(Debug, Clone)]
pub struct Frame {
    df: DataFrame,
}

impl Frame {
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn as_dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    /// Parse raw bytes with default options
    pub fn load(bytes: &[u8], format: DataFormat) -> Result<Self> {
        Self::load_with(bytes, format, &LoadOptions::default())
    }

    /// Parse raw bytes, decoding as UTF-8 with a windows-1252 fallback
    pub fn load_with(bytes: &[u8], format: DataFormat, options: &LoadOptions) -> Result<Self> {
        let (text, encoding) = decode_with_fallback(bytes);

        let parsed = match format {
            DataFormat::Csv => read_csv(text, options),
            DataFormat::Json => read_json(text),
        };

        let df = parsed.map_err(|e| {
            CleanerError::format(format!(
                "failed to parse {} input decoded as {}: {}",
                format, encoding, e
            ))
        })?;

        debug!(
            "Loaded {} frame ({}): {} rows x {} columns",
            format,
            encoding,
            df.height(),
            df.width()
        );

        Ok(Self { df })
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn column_count(&self) -> usize {
        self.df.width()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn columns(&self) -> Vec<ColumnInfo> {
        self.df
            .get_columns()
            .iter()
            .map(|column| ColumnInfo {
                name: column.name().to_string(),
                kind: ColumnKind::from_dtype(column.dtype()),
            })
            .collect()
    }

    pub fn column_kind(&self, name: &str) -> Result<ColumnKind> {
        self.df
            .column(name)
            .map(|column| ColumnKind::from_dtype(column.dtype()))
            .map_err(|_| CleanerError::column_not_found(name))
    }

    /// Every column whose kind is integer or floating-point, in frame order
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns()
            .into_iter()
            .filter(|column| column.kind.is_numeric())
            .map(|column| column.name)
            .collect()
    }

    /// Null cells per column, in frame order
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.df
            .get_columns()
            .iter()
            .map(|column| (column.name().to_string(), column.null_count()))
            .collect()
    }

    /// Total null cells across all columns
    pub fn null_count(&self) -> usize {
        self.df
            .get_columns()
            .iter()
            .map(|column| column.null_count())
            .sum()
    }

    /// Fail with a column type error unless `column` exists and is numeric
    pub fn require_numeric(&self, column: &str, operation: &str) -> Result<()> {
        let kind = self.column_kind(column)?;
        if kind.is_numeric() {
            Ok(())
        } else {
            Err(CleanerError::column_type(column, kind.as_str(), operation))
        }
    }

    /// Values of a numeric column as floats, in row order
    pub fn numeric_values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        self.require_numeric(column, "numeric_values")?;
        let series = self
            .df
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series.f64()?.into_iter().collect())
    }

    /// Linear-interpolated quantile over the column's non-null values.
    ///
    /// Returns `None` when the column holds no values.
    pub fn quantile(&self, column: &str, q: f64) -> Result<Option<f64>> {
        if !(0.0..=1.0).contains(&q) {
            return Err(CleanerError::invalid_parameter(
                "q",
                format!("quantile must lie in [0, 1], got {}", q),
            ));
        }
        self.require_numeric(column, "quantile")?;

        let mut values: Vec<f64> = self
            .numeric_values(column)?
            .into_iter()
            .flatten()
            .filter(|value| !value.is_nan())
            .collect();

        Ok(linear_quantile(&mut values, q))
    }

    /// New frame holding the rows for which `predicate(row_index)` holds
    pub fn filter<F>(&self, predicate: F) -> Result<Self>
    where
        F: FnMut(usize) -> bool,
    {
        let mask: Vec<bool> = (0..self.row_count()).map(predicate).collect();
        self.filter_mask(&mask)
    }

    /// New frame holding the rows whose mask entry is `true`
    pub fn filter_mask(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.row_count() {
            return Err(CleanerError::internal(format!(
                "row mask has {} entries for a frame of {} rows",
                mask.len(),
                self.row_count()
            )));
        }
        let mask: BooleanChunked = mask.iter().copied().collect();
        Ok(Self {
            df: self.df.filter(&mask)?,
        })
    }

    /// Flags every row that repeats an earlier row across all columns.
    ///
    /// Nulls compare equal to nulls; the first occurrence is never flagged.
    pub fn duplicate_mask(&self) -> Result<Vec<bool>> {
        let rendered = self
            .df
            .get_columns()
            .iter()
            .map(|column| render_text(column.as_materialized_series()))
            .collect::<PolarsResult<Vec<Series>>>()?;

        let cells = rendered
            .iter()
            .map(|series| {
                series
                    .str()
                    .map(|values| values.into_iter().collect::<Vec<Option<&str>>>())
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(self.row_count());
        let mask = (0..self.row_count())
            .map(|row| {
                let key: Vec<Option<&str>> = cells.iter().map(|column| column[row]).collect();
                !seen.insert(key)
            })
            .collect();

        Ok(mask)
    }

    /// New frame with the null cells of the listed columns filled
    ///
    /// A text fill on a nested column renders its values as text first.
    pub fn fill_nulls(&self, fills: &[(String, FillValue)]) -> Result<Self> {
        if fills.is_empty() {
            return Ok(self.clone());
        }

        let mut df = self.df.clone();
        for (name, value) in fills {
            if !matches!(value, FillValue::Text(_)) {
                continue;
            }
            let series = df
                .column(name)
                .map_err(|_| CleanerError::column_not_found(name))?
                .as_materialized_series();
            if series.dtype().is_nested() {
                let rendered = render_text(series)?;
                df.with_column(rendered)?;
            }
        }

        let exprs: Vec<Expr> = fills
            .iter()
            .map(|(name, value)| {
                let column = col(name.as_str());
                match value {
                    FillValue::Text(text) => column
                        .cast(DataType::String)
                        .fill_null(lit(text.clone())),
                    FillValue::Integer(number) => column.fill_null(lit(*number)),
                    FillValue::Boolean(flag) => column.fill_null(lit(*flag)),
                }
            })
            .collect();

        let df = df.lazy().with_columns(exprs).collect()?;
        Ok(Self { df })
    }

    /// Append the rows of `other` below this frame
    pub fn append(&mut self, other: &Frame) -> Result<()> {
        self.df = self.df.vstack(&other.df)?;
        Ok(())
    }

    /// Serialize with a header row, preserving column order
    ///
    /// CSV has no nested values, so list and struct cells are written as text.
    pub fn serialize(&self, format: DataFormat) -> Result<Vec<u8>> {
        let mut df = self.df.clone();
        let mut buffer = Vec::new();

        match format {
            DataFormat::Csv => {
                let nested: Vec<Series> = df
                    .get_columns()
                    .iter()
                    .map(|column| column.as_materialized_series())
                    .filter(|series| series.dtype().is_nested())
                    .map(render_text)
                    .collect::<PolarsResult<_>>()?;
                for series in nested {
                    df.with_column(series)?;
                }
                CsvWriter::new(&mut buffer)
                    .include_header(true)
                    .finish(&mut df)?;
            }
            DataFormat::Json => {
                JsonWriter::new(&mut buffer)
                    .with_json_format(JsonFormat::Json)
                    .finish(&mut df)?;
            }
        }

        Ok(buffer)
    }
}

fn read_csv(text: String, options: &LoadOptions) -> PolarsResult<DataFrame> {
    let null_values = CSV_NULL_MARKERS
        .iter()
        .map(|marker| PlSmallStr::from(*marker))
        .collect();

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length))
        .with_parse_options(
            CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(null_values))),
        )
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
}

fn read_json(text: String) -> PolarsResult<DataFrame> {
    JsonReader::new(Cursor::new(text.into_bytes())).finish()
}

/// Values of a series as strings, nulls kept
///
/// Polars has no string cast for nested dtypes, so those are formatted value
/// by value.
fn render_text(series: &Series) -> PolarsResult<Series> {
    if !series.dtype().is_nested() {
        return series.cast(&DataType::String);
    }
    let values = (0..series.len())
        .map(|row| {
            series.get(row).map(|value| match value {
                AnyValue::Null => None,
                other => Some(other.to_string()),
            })
        })
        .collect::<PolarsResult<Vec<Option<String>>>>()?;
    Ok(Series::new(series.name().clone(), values))
}

/// Quantile at position `q * (n - 1)` over the ascending values
fn linear_quantile(values: &mut [f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let position = q * (values.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(values[lower] + (values[upper] - values[lower]) * fraction)
}
