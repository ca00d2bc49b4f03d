//! Publication of cleaned and duplicates artifacts to the blob store

use crate::constants::{CLEAN_PREFIX, CSV_CONTENT_TYPE, DUPLICATES_PREFIX};
use crate::error::{CleanerError, Result};
use crate::frame::{DataFormat, Frame};
use crate::models::DatasetRef;
use crate::pipeline::PipelineRun;
use crate::storage::{BlobStore, join_path};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Where a published artifact lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLocation {
    pub path: String,
    pub url: String,
}

/// Published duplicates artifact with the number of rows it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatesArtifact {
    pub location: ArtifactLocation,
    pub record_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifacts {
    pub clean: ArtifactLocation,
    pub duplicates: Option<DuplicatesArtifact>,
}

/// Path of the cleaned artifact for a dataset file name
pub fn clean_path(file_name: &str) -> String {
    join_path(&[CLEAN_PREFIX, &format!("clean_{}", file_name)])
}

/// Path of the duplicates artifact for a dataset file name
pub fn duplicates_path(file_name: &str) -> String {
    join_path(&[DUPLICATES_PREFIX, &format!("duplicates_{}", file_name)])
}

pub struct ArtifactPublisher {
    store: Arc<dyn BlobStore>,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Write the cleaned frame and, when present, the duplicates as CSV
    ///
    /// Artifacts are always CSV regardless of the dataset's own format, and
    /// republishing the same dataset overwrites the previous artifacts.
    pub async fn publish(&self, dataset: &DatasetRef, run: &PipelineRun) -> Result<PublishedArtifacts> {
        if !run.status.is_completed() {
            return Err(CleanerError::internal(format!(
                "refusing to publish artifacts of failed run for dataset {}",
                dataset.id
            )));
        }

        let file_name = dataset.file_name();
        let clean = self.write(&clean_path(file_name), &run.frame).await?;

        let duplicates = match &run.duplicates {
            Some(frame) if !frame.is_empty() => Some(DuplicatesArtifact {
                location: self.write(&duplicates_path(file_name), frame).await?,
                record_count: frame.row_count() as u64,
            }),
            _ => None,
        };

        info!(
            "Published {}{}",
            clean.path,
            duplicates
                .as_ref()
                .map(|d| format!(" and {} ({} rows)", d.location.path, d.record_count))
                .unwrap_or_default()
        );

        Ok(PublishedArtifacts { clean, duplicates })
    }

    async fn write(&self, path: &str, frame: &Frame) -> Result<ArtifactLocation> {
        let bytes = frame.serialize(DataFormat::Csv)?;
        self.store.put(path, bytes, CSV_CONTENT_TYPE).await?;
        Ok(ArtifactLocation {
            path: path.to_string(),
            url: self.store.public_url(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationDescriptor;
    use crate::pipeline::CleaningPipeline;
    use crate::storage::MemoryBlobStore;

    fn dataset() -> DatasetRef {
        DatasetRef {
            id: 3,
            name: "orders.json".to_string(),
            storage_path: "datasets/orders.json".to_string(),
        }
    }

    fn run(text: &str, kinds: &[&str]) -> PipelineRun {
        let frame = Frame::load(text.as_bytes(), DataFormat::Csv).unwrap();
        let operations: Vec<OperationDescriptor> =
            kinds.iter().map(|kind| OperationDescriptor::new(*kind)).collect();
        CleaningPipeline::new().run(dataset(), frame, &operations)
    }

    #[test]
    fn test_artifact_paths() {
        assert_eq!(clean_path("sales.csv"), "clean/clean_sales.csv");
        assert_eq!(duplicates_path("sales.csv"), "duplicates/duplicates_sales.csv");
    }

    #[tokio::test]
    async fn test_publish_clean_and_duplicates() {
        let store = Arc::new(MemoryBlobStore::new());
        let publisher = ArtifactPublisher::new(store.clone());

        let artifacts = publisher
            .publish(&dataset(), &run("a,b\n1,x\n1,x\n2,y\n", &["deduplicate"]))
            .await
            .unwrap();

        assert_eq!(artifacts.clean.path, "clean/clean_orders.json");
        assert_eq!(artifacts.clean.url, "memory://clean/clean_orders.json");
        let duplicates = artifacts.duplicates.unwrap();
        assert_eq!(duplicates.location.path, "duplicates/duplicates_orders.json");
        assert_eq!(duplicates.record_count, 1);

        let clean = String::from_utf8(store.get("clean/clean_orders.json").await.unwrap()).unwrap();
        assert_eq!(clean.lines().next(), Some("a,b"));
        assert_eq!(clean.lines().count(), 3);
        assert_eq!(
            store.content_type("clean/clean_orders.json").await.as_deref(),
            Some("text/csv")
        );
    }

    #[tokio::test]
    async fn test_no_duplicates_artifact_without_duplicates() {
        let store = Arc::new(MemoryBlobStore::new());
        let publisher = ArtifactPublisher::new(store.clone());

        let artifacts = publisher
            .publish(&dataset(), &run("a\n1\n2\n", &["deduplicate"]))
            .await
            .unwrap();

        assert!(artifacts.duplicates.is_none());
        assert_eq!(store.paths().await, vec!["clean/clean_orders.json".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_run_is_not_published() {
        let store = Arc::new(MemoryBlobStore::new());
        let publisher = ArtifactPublisher::new(store.clone());
        let failed = CleaningPipeline::new().run(
            dataset(),
            Frame::load(b"a\nx\n", DataFormat::Csv).unwrap(),
            &[OperationDescriptor::new("remove_outliers")
                .with_parameter("columns", serde_json::json!(["a"]))],
        );

        let result = publisher.publish(&dataset(), &failed).await;

        assert!(matches!(result, Err(CleanerError::Internal { .. })));
        assert!(store.paths().await.is_empty());
    }
}
