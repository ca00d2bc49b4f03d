//! Metadata catalog of datasets, cleaning runs and duplicate sets
//!
//! Records are JSON objects grouped in named tables. Inserting assigns an
//! integer `id` unique within the table.

pub mod json_file;
pub mod memory;
mod tables;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use json_file::JsonFileCatalog;
pub use memory::MemoryCatalog;

/// Equality condition on one record field
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Value) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort key of a query
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Insert `record` into `table`, returning it with its assigned `id`
    async fn insert(&self, table: &str, record: Value) -> Result<Value>;

    /// Merge `fields` into the record with `id`, returning the updated record
    async fn update(&self, table: &str, id: i64, fields: Value) -> Result<Value>;

    /// Records matching every filter, sorted by `order` when given
    ///
    /// Without an order, records come back in insertion order.
    async fn query(&self, table: &str, filters: &[Filter], order: Option<&Order>)
    -> Result<Vec<Value>>;
}
