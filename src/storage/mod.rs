//! Blob storage for raw datasets and published artifacts
//!
//! Paths are `/`-separated and relative to the store root, e.g.
//! `clean/clean_sales.csv`. Writing to an existing path overwrites it.

pub mod local;
pub mod memory;

use crate::error::Result;
use async_trait::async_trait;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob at `path`, failing with `BlobNotFound` when absent
    async fn get(&self, path: &str) -> Result<Vec<u8>>;

    /// Write `bytes` to `path`, replacing any previous blob
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Publicly reachable location of the blob at `path`
    fn public_url(&self, path: &str) -> String;
}

/// Join path segments with `/`, dropping empty segments and stray separators
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
