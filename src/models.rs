//! Core data structures exchanged with callers and collaborators.
//!
//! Defines operation descriptors and results, dataset records, cleaning
//! requests and the summary returned at the end of an invocation.

use crate::error::{CleanerError, Result};
use crate::frame::DataFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form parameters attached to an operation descriptor
pub type Parameters = Map<String, Value>;

/// One requested cleaning operation, exactly as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    #[serde(alias = "tipo")]
    pub kind: String,

    #[serde(default, alias = "parametros")]
    pub parameters: Parameters,
}

impl OperationDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// Effect of one executed operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub kind: String,
    pub parameters: Parameters,
    pub rows_affected: u64,
}

/// Reference to the dataset a pipeline run consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    pub id: i64,
    pub name: String,
    pub storage_path: String,
}

impl DatasetRef {
    /// Final path segment of the stored dataset, used to derive artifact names
    pub fn file_name(&self) -> &str {
        self.storage_path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(self.name.as_str())
    }
}

/// Dataset registration as stored in the `datasets` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: i64,
    pub name: String,
    pub storage_path: String,
    pub format: DataFormat,
    pub row_count: u64,
    pub column_count: u64,
    #[serde(default)]
    pub metadata: Value,
    pub uploaded_at: String,
}

impl DatasetRecord {
    pub fn from_record(record: &Value) -> Result<Self> {
        serde_json::from_value(record.clone()).map_err(|e| {
            CleanerError::catalog(
                crate::constants::tables::DATASETS,
                format!("malformed dataset record: {}", e),
            )
        })
    }

    pub fn reference(&self) -> DatasetRef {
        DatasetRef {
            id: self.id,
            name: self.name.clone(),
            storage_path: self.storage_path.clone(),
        }
    }
}

/// Cleaning invocation input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRequest {
    pub dataset_id: i64,
    pub operations: Vec<OperationDescriptor>,
}

/// Cleaning invocation output, ready to serialize into a response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub run_id: i64,
    pub operations: Vec<OperationResult>,
    pub total_rows_affected: u64,
    pub clean_url: String,
    pub duplicates_url: Option<String>,
}
