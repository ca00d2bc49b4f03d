//! Exact-duplicate row removal
//!
//! A row is a duplicate when every column value equals the values of some
//! earlier row. The first occurrence is kept; every later identical row is
//! removed and handed back so the pipeline can accumulate the side-table.

use crate::error::Result;
use crate::frame::Frame;
use tracing::{debug, info};

use super::OperationOutcome;

/// Remove rows that repeat an earlier row
///
/// # Arguments
///
/// * `frame` - Frame to deduplicate; left untouched
///
/// # Returns
///
/// Outcome holding the deduplicated frame, the number of removed rows and the
/// removed rows themselves when there were any
pub fn deduplicate(frame: &Frame) -> Result<OperationOutcome> {
    let duplicate_mask = frame.duplicate_mask()?;
    let removed = duplicate_mask.iter().filter(|&&is_duplicate| is_duplicate).count();

    if removed == 0 {
        debug!("No duplicate rows among {} rows", frame.row_count());
        return Ok(OperationOutcome::unchanged(frame.clone()));
    }

    let keep_mask: Vec<bool> = duplicate_mask.iter().map(|&is_duplicate| !is_duplicate).collect();
    let kept = frame.filter_mask(&keep_mask)?;
    let duplicates = frame.filter_mask(&duplicate_mask)?;

    info!(
        "Deduplication complete: removed {} duplicate rows, {} rows remaining",
        removed,
        kept.row_count()
    );

    Ok(OperationOutcome {
        frame: kept,
        rows_affected: removed as u64,
        duplicates: Some(duplicates),
    })
}
