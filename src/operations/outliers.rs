//! IQR-based outlier removal
//!
//! For each target column in the listed order, Q1 and Q3 are computed over
//! the frame as already filtered by the previous columns, and rows outside
//! `[Q1 - t*IQR, Q3 + t*IQR]` are dropped. Null and NaN values never satisfy
//! a bound, so their rows are dropped as well.

use crate::constants::{LOWER_QUARTILE, UPPER_QUARTILE, parameters};
use crate::error::{CleanerError, Result};
use crate::frame::Frame;
use crate::models::Parameters;
use serde_json::Value;
use tracing::{debug, info};

use super::{OperationKind, OperationOutcome};

/// Validated parameters of the outlier removal operation
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveOutliers {
    /// Target columns; `None` means every numeric column at run time
    pub columns: Option<Vec<String>>,
    /// IQR multiplier, strictly positive
    pub threshold: f64,
}

impl RemoveOutliers {
    pub fn new(columns: Option<Vec<String>>, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(CleanerError::invalid_parameter(
                parameters::THRESHOLD,
                format!("must be a positive number, got {}", threshold),
            ));
        }
        Ok(Self { columns, threshold })
    }

    /// Read `columns` and `threshold` (or their `columnas`/`umbral` aliases)
    pub fn from_parameters(params: &Parameters, default_threshold: f64) -> Result<Self> {
        let columns = match lookup(params, parameters::COLUMNS, parameters::COLUMNS_ALIAS) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(vec![name.clone()]),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_owned).ok_or_else(|| {
                            CleanerError::invalid_parameter(
                                parameters::COLUMNS,
                                format!("column names must be strings, got {}", item),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(other) => {
                return Err(CleanerError::invalid_parameter(
                    parameters::COLUMNS,
                    format!("expected a list of column names, got {}", other),
                ));
            }
        };

        let threshold = match lookup(params, parameters::THRESHOLD, parameters::THRESHOLD_ALIAS) {
            None | Some(Value::Null) => default_threshold,
            Some(Value::Number(number)) => number.as_f64().ok_or_else(|| {
                CleanerError::invalid_parameter(parameters::THRESHOLD, "not representable as f64")
            })?,
            Some(Value::String(text)) => text.trim().parse::<f64>().map_err(|e| {
                CleanerError::invalid_parameter(
                    parameters::THRESHOLD,
                    format!("'{}' is not a number: {}", text, e),
                )
            })?,
            Some(other) => {
                return Err(CleanerError::invalid_parameter(
                    parameters::THRESHOLD,
                    format!("expected a number, got {}", other),
                ));
            }
        };

        Self::new(columns, threshold)
    }
}

fn lookup<'a>(params: &'a Parameters, name: &str, alias: &str) -> Option<&'a Value> {
    params.get(name).or_else(|| params.get(alias))
}

/// Inclusive bounds outside which a value is an outlier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Compute `[Q1 - t*IQR, Q3 + t*IQR]` for a numeric column.
///
/// Returns `None` when the column holds no values.
pub fn iqr_bounds(frame: &Frame, column: &str, threshold: f64) -> Result<Option<OutlierBounds>> {
    let q1 = frame.quantile(column, LOWER_QUARTILE)?;
    let q3 = frame.quantile(column, UPPER_QUARTILE)?;

    Ok(match (q1, q3) {
        (Some(q1), Some(q3)) => {
            let iqr = q3 - q1;
            Some(OutlierBounds {
                lower: q1 - threshold * iqr,
                upper: q3 + threshold * iqr,
            })
        }
        _ => None,
    })
}

/// Drop rows outside the IQR bounds of every target column
///
/// Every listed column is checked for existence and numeric kind before any
/// row is dropped. Bounds of later columns are computed on the frame already
/// filtered by earlier ones.
pub fn remove_outliers(frame: &Frame, params: &RemoveOutliers) -> Result<OperationOutcome> {
    let columns = match &params.columns {
        Some(columns) => columns.clone(),
        None => frame.numeric_columns(),
    };

    for column in &columns {
        frame.require_numeric(column, OperationKind::RemoveOutliers.as_str())?;
    }

    let mut current = frame.clone();
    for column in &columns {
        let before = current.row_count();
        let bounds = iqr_bounds(&current, column, params.threshold)?;
        let values = current.numeric_values(column)?;

        current = match bounds {
            Some(bounds) => {
                current.filter(|row| values[row].is_some_and(|value| bounds.contains(value)))?
            }
            None => current.filter(|_| false)?,
        };

        debug!(
            "Outlier bounds for '{}': {:?}, removed {} rows",
            column,
            bounds,
            before - current.row_count()
        );
    }

    let removed = frame.row_count() - current.row_count();
    info!(
        "Outlier removal complete: removed {} rows across {} columns (threshold {})",
        removed,
        columns.len(),
        params.threshold
    );

    Ok(OperationOutcome {
        frame: current,
        rows_affected: removed as u64,
        duplicates: None,
    })
}
