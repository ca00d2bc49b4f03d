//! In-process blob store

use super::BlobStore;
use crate::error::{CleanerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

/// Blob store keeping every blob in memory, addressed as `memory://<path>`
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type recorded for `path`, if the blob exists
    pub async fn content_type(&self, path: &str) -> Option<String> {
        self.blobs
            .read()
            .await
            .get(path)
            .map(|blob| blob.content_type.clone())
    }

    /// Stored paths in lexical order
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(path)
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| CleanerError::BlobNotFound {
                path: path.to_string(),
            })
    }

    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        debug!("Storing {} bytes at memory://{}", bytes.len(), path);
        self.blobs.write().await.insert(
            path.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{}", path)
    }
}
