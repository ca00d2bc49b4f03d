//! Cleaning operations over a [`Frame`].
//!
//! Descriptors arrive as free-form `{kind, parameters}` pairs and are turned
//! into a closed [`CleaningOperation`] only when the pipeline reaches them.
//! Kinds outside the known set become [`CleaningOperation::Unrecognized`] and
//! run as no-ops.
//!
//! Each operation consumes a frame and returns an [`OperationOutcome`]: the
//! new frame, the number of affected units and, for deduplication, the rows
//! that were removed. Units differ by kind: rows for deduplication and
//! outlier removal, cells for null filling.

pub mod deduplicate;
pub mod fill_nulls;
pub mod outliers;

#[cfg(test)]
mod tests;

use crate::constants::DEFAULT_OUTLIER_THRESHOLD;
use crate::error::Result;
use crate::frame::Frame;
use crate::models::OperationDescriptor;
use serde::Serialize;
use std::fmt;

pub use deduplicate::deduplicate;
pub use fill_nulls::fill_nulls;
pub use outliers::{OutlierBounds, RemoveOutliers, iqr_bounds, remove_outliers};

/// Operation kinds the engine knows how to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Deduplicate,
    FillNulls,
    RemoveOutliers,
}

impl OperationKind {
    /// Match a submitted kind string, ignoring case and treating `-` as `_`
    pub fn parse(kind: &str) -> Option<Self> {
        let normalized = kind.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "deduplicate" | "duplicates" | "duplicados" => Some(OperationKind::Deduplicate),
            "fill_nulls" | "nulls" | "nulos" => Some(OperationKind::FillNulls),
            "remove_outliers" | "outliers" => Some(OperationKind::RemoveOutliers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deduplicate => "deduplicate",
            OperationKind::FillNulls => "fill_nulls",
            OperationKind::RemoveOutliers => "remove_outliers",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated cleaning operation
#[derive(Debug, Clone, PartialEq)]
pub enum CleaningOperation {
    Deduplicate,
    FillNulls,
    RemoveOutliers(RemoveOutliers),
    /// Unknown kind, kept so it can be reported with zero effect
    Unrecognized(String),
}

impl CleaningOperation {
    /// Validate a descriptor using the default outlier threshold
    pub fn from_descriptor(descriptor: &OperationDescriptor) -> Result<Self> {
        Self::from_descriptor_with(descriptor, DEFAULT_OUTLIER_THRESHOLD)
    }

    /// Validate a descriptor, using `default_threshold` when none is given
    pub fn from_descriptor_with(
        descriptor: &OperationDescriptor,
        default_threshold: f64,
    ) -> Result<Self> {
        let operation = match OperationKind::parse(&descriptor.kind) {
            Some(OperationKind::Deduplicate) => CleaningOperation::Deduplicate,
            Some(OperationKind::FillNulls) => CleaningOperation::FillNulls,
            Some(OperationKind::RemoveOutliers) => CleaningOperation::RemoveOutliers(
                RemoveOutliers::from_parameters(&descriptor.parameters, default_threshold)?,
            ),
            None => CleaningOperation::Unrecognized(descriptor.kind.clone()),
        };
        Ok(operation)
    }

    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            CleaningOperation::Deduplicate => Some(OperationKind::Deduplicate),
            CleaningOperation::FillNulls => Some(OperationKind::FillNulls),
            CleaningOperation::RemoveOutliers(_) => Some(OperationKind::RemoveOutliers),
            CleaningOperation::Unrecognized(_) => None,
        }
    }

    /// Run the operation against `frame`, leaving `frame` untouched
    pub fn apply(&self, frame: &Frame) -> Result<OperationOutcome> {
        match self {
            CleaningOperation::Deduplicate => deduplicate(frame),
            CleaningOperation::FillNulls => fill_nulls(frame),
            CleaningOperation::RemoveOutliers(params) => remove_outliers(frame, params),
            CleaningOperation::Unrecognized(_) => Ok(OperationOutcome::unchanged(frame.clone())),
        }
    }
}

impl fmt::Display for CleaningOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleaningOperation::Deduplicate => f.write_str(OperationKind::Deduplicate.as_str()),
            CleaningOperation::FillNulls => f.write_str(OperationKind::FillNulls.as_str()),
            CleaningOperation::RemoveOutliers(params) => write!(
                f,
                "{}(threshold={})",
                OperationKind::RemoveOutliers,
                params.threshold
            ),
            CleaningOperation::Unrecognized(kind) => write!(f, "unrecognized({})", kind),
        }
    }
}

/// Result of applying one operation
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub frame: Frame,
    pub rows_affected: u64,
    /// Rows removed as duplicates, present only when some were found
    pub duplicates: Option<Frame>,
}

impl OperationOutcome {
    pub fn unchanged(frame: Frame) -> Self {
        Self {
            frame,
            rows_affected: 0,
            duplicates: None,
        }
    }
}
