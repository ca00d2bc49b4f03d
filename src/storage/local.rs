//! Filesystem-backed blob store

use super::BlobStore;
use crate::error::{CleanerError, Result};
use async_trait::async_trait;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Blob store rooted at a local directory
///
/// Public URLs are built from `public_base_url` when configured, otherwise
/// they are `file://` URLs of the stored file.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base_url: None,
        }
    }

    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = Some(base_url.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a blob path below the root, rejecting escapes
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));

        if path.is_empty() || escapes {
            return Err(CleanerError::store(
                path,
                "blob paths must be relative and stay below the store root",
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.resolve(path)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == IoErrorKind::NotFound => Err(CleanerError::BlobNotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(CleanerError::io(file, e)),
        }
    }

    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CleanerError::io(parent, e))?;
        }

        debug!(
            "Writing {} bytes ({}) to {}",
            bytes.len(),
            content_type,
            file.display()
        );
        tokio::fs::write(&file, bytes)
            .await
            .map_err(|e| CleanerError::io(&file, e))
    }

    fn public_url(&self, path: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), path),
            None => format!("file://{}", self.root.join(path).display()),
        }
    }
}
