//! Null filling with kind-dependent placeholders
//!
//! Textual and nested columns receive `"N/A"`. Integer, float and all-null columns
//! receive `0`. Boolean columns receive `false` so they stay boolean.

use crate::constants::{NUMERIC_NULL_PLACEHOLDER, TEXT_NULL_PLACEHOLDER};
use crate::error::Result;
use crate::frame::{ColumnKind, FillValue, Frame};
use tracing::{debug, info};

use super::OperationOutcome;

/// Placeholder used for null cells of a column of the given kind
pub fn placeholder_for(kind: ColumnKind) -> FillValue {
    match kind {
        ColumnKind::Text | ColumnKind::Nested => FillValue::Text(TEXT_NULL_PLACEHOLDER.to_string()),
        ColumnKind::Boolean => FillValue::Boolean(NUMERIC_NULL_PLACEHOLDER != 0),
        ColumnKind::Integer | ColumnKind::Float | ColumnKind::Null => {
            FillValue::Integer(NUMERIC_NULL_PLACEHOLDER)
        }
    }
}

/// Fill every null cell of every column
///
/// `rows_affected` of the outcome counts filled cells, not rows.
pub fn fill_nulls(frame: &Frame) -> Result<OperationOutcome> {
    let null_counts = frame.null_counts();
    let filled_cells: usize = null_counts.iter().map(|(_, count)| count).sum();

    if filled_cells == 0 {
        debug!("No null cells to fill");
        return Ok(OperationOutcome::unchanged(frame.clone()));
    }

    let mut fills = Vec::new();
    for column in frame.columns() {
        let nulls = null_counts
            .iter()
            .find(|(name, _)| *name == column.name)
            .map_or(0, |(_, count)| *count);
        if nulls == 0 {
            continue;
        }
        debug!(
            "Filling {} null cells in {} column '{}'",
            nulls, column.kind, column.name
        );
        fills.push((column.name, placeholder_for(column.kind)));
    }

    let filled = frame.fill_nulls(&fills)?;

    info!(
        "Null filling complete: {} cells filled across {} columns",
        filled_cells,
        fills.len()
    );

    Ok(OperationOutcome {
        frame: filled,
        rows_affected: filled_cells as u64,
        duplicates: None,
    })
}
