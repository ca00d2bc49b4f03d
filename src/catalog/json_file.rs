//! Metadata catalog persisted to a single JSON file
//!
//! The whole catalog is rewritten after every insert or update. The file is
//! written to a sibling temporary path first and then renamed over the old
//! one.

use super::tables::Tables;
use super::{Filter, MetadataCatalog, Order};
use crate::error::{CleanerError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonFileCatalog {
    /// Open the catalog at `path`, starting empty when the file does not exist
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let tables = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CleanerError::catalog(
                    "*",
                    format!("catalog file {} is not valid: {}", path.display(), e),
                )
            })?,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                info!("Creating new catalog at {}", path.display());
                Tables::default()
            }
            Err(e) => return Err(CleanerError::io(path, e)),
        };

        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, tables: &Tables) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(tables)
            .map_err(|e| CleanerError::catalog("*", format!("failed to encode catalog: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CleanerError::io(parent, e))?;
        }

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|e| CleanerError::io(&staging, e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| CleanerError::io(&self.path, e))?;

        debug!("Catalog written to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl MetadataCatalog for JsonFileCatalog {
    async fn insert(&self, table: &str, record: Value) -> Result<Value> {
        let mut tables = self.tables.lock().await;
        let inserted = tables.insert(table, record)?;
        self.persist(&tables).await?;
        Ok(inserted)
    }

    async fn update(&self, table: &str, id: i64, fields: Value) -> Result<Value> {
        let mut tables = self.tables.lock().await;
        let updated = tables.update(table, id, fields)?;
        self.persist(&tables).await?;
        Ok(updated)
    }

    async fn query(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>> {
        Ok(self.tables.lock().await.query(table, filters, order))
    }
}
