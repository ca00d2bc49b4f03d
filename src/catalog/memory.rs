//! In-process metadata catalog

use super::tables::Tables;
use super::{Filter, MetadataCatalog, Order};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataCatalog for MemoryCatalog {
    async fn insert(&self, table: &str, record: Value) -> Result<Value> {
        self.tables.write().await.insert(table, record)
    }

    async fn update(&self, table: &str, id: i64, fields: Value) -> Result<Value> {
        self.tables.write().await.update(table, id, fields)
    }

    async fn query(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>> {
        Ok(self.tables.read().await.query(table, filters, order))
    }
}
