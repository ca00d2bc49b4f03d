//! Cleaning service
//!
//! Ties the blob store, the metadata catalog and the pipeline together into
//! the operations exposed to callers: registering datasets, cleaning them and
//! listing what has been done so far.

use crate::catalog::{Filter, JsonFileCatalog, MetadataCatalog, Order};
use crate::config::CleanerConfig;
use crate::constants::{DATASETS_PREFIX, tables};
use crate::error::{CleanerError, Result};
use crate::frame::{DataFormat, Frame, LoadOptions};
use crate::models::{
    CleaningRequest, CleaningSummary, DatasetRecord, DatasetRef, OperationDescriptor,
};
use crate::pipeline::{CleaningPipeline, PipelineRun, RunStatus};
use crate::publisher::ArtifactPublisher;
use crate::recorder::{RunRecord, RunRecorder};
use crate::storage::{BlobStore, LocalBlobStore, join_path};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct CleaningService {
    store: Arc<dyn BlobStore>,
    catalog: Arc<dyn MetadataCatalog>,
    pipeline: CleaningPipeline,
    publisher: ArtifactPublisher,
    recorder: RunRecorder,
    load_options: LoadOptions,
}

impl CleaningService {
    pub fn new(store: Arc<dyn BlobStore>, catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self {
            publisher: ArtifactPublisher::new(store.clone()),
            recorder: RunRecorder::new(catalog.clone()),
            store,
            catalog,
            pipeline: CleaningPipeline::default(),
            load_options: LoadOptions::default(),
        }
    }

    /// Service over a local blob store and a JSON file catalog
    pub async fn from_config(config: &CleanerConfig) -> Result<Self> {
        let mut store = LocalBlobStore::new(&config.storage_root);
        if let Some(base_url) = &config.public_base_url {
            store = store.with_public_base_url(base_url.clone());
        }
        let catalog = JsonFileCatalog::open(config.catalog_file()).await?;

        Ok(Self::new(Arc::new(store), Arc::new(catalog))
            .with_pipeline(CleaningPipeline::new().with_default_threshold(config.outlier_threshold))
            .with_load_options(config.load_options()))
    }

    pub fn with_pipeline(mut self, pipeline: CleaningPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_load_options(mut self, options: LoadOptions) -> Self {
        self.load_options = options;
        self
    }

    /// Upload a CSV or JSON dataset and register it in the catalog
    pub async fn register_dataset(&self, name: &str, bytes: Vec<u8>) -> Result<DatasetRecord> {
        if name.trim().is_empty() || name.contains('/') || name.contains('\\') {
            return Err(CleanerError::invalid_parameter(
                "name",
                format!("'{}' is not a plain file name", name),
            ));
        }
        let format = DataFormat::from_path(name)?;
        let frame = Frame::load_with(&bytes, format, &self.load_options)?;

        let storage_path = join_path(&[DATASETS_PREFIX, name]);
        self.store
            .put(&storage_path, bytes, format.content_type())
            .await?;

        let record = self
            .catalog
            .insert(
                tables::DATASETS,
                json!({
                    "name": name,
                    "storage_path": storage_path,
                    "format": format,
                    "row_count": frame.row_count(),
                    "column_count": frame.column_count(),
                    "metadata": { "columns": frame.columns() },
                    "uploaded_at": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
                }),
            )
            .await?;

        let dataset = DatasetRecord::from_record(&record)?;
        info!(
            "Registered dataset {} '{}' ({} rows x {} columns)",
            dataset.id, dataset.name, dataset.row_count, dataset.column_count
        );
        Ok(dataset)
    }

    /// Registered datasets, most recent first
    pub async fn list_datasets(&self) -> Result<Vec<DatasetRecord>> {
        self.catalog
            .query(tables::DATASETS, &[], Some(&Order::descending("uploaded_at")))
            .await?
            .iter()
            .map(DatasetRecord::from_record)
            .collect()
    }

    pub async fn dataset(&self, id: i64) -> Result<DatasetRecord> {
        let records = self
            .catalog
            .query(tables::DATASETS, &[Filter::eq("id", id)], None)
            .await?;

        match records.first() {
            Some(record) => DatasetRecord::from_record(record),
            None => Err(CleanerError::missing_input(format!("dataset {}", id))),
        }
    }

    /// Cleaning runs, most recent first
    pub async fn list_runs(&self) -> Result<Vec<RunRecord>> {
        self.recorder.all_runs().await
    }

    /// Cleaning runs of one dataset, most recent first
    pub async fn list_runs_for_dataset(&self, dataset_id: i64) -> Result<Vec<RunRecord>> {
        self.recorder.runs_for_dataset(dataset_id).await
    }

    /// Run the requested operations against a registered dataset
    ///
    /// On success the cleaned (and duplicates) artifacts are published and
    /// the run is recorded. When an operation fails, only the failure notice
    /// is recorded and the operation's error is returned, even when the
    /// notice itself cannot be written.
    pub async fn clean_dataset(&self, request: CleaningRequest) -> Result<CleaningSummary> {
        if request.operations.is_empty() {
            return Err(CleanerError::invalid_parameter(
                "operations",
                "at least one operation is required",
            ));
        }

        let record = self.dataset(request.dataset_id).await?;
        let dataset = record.reference();

        let bytes = self
            .store
            .get(&dataset.storage_path)
            .await
            .map_err(|e| match e {
                CleanerError::BlobNotFound { path } => CleanerError::missing_input(format!(
                    "dataset {} has no stored data at '{}'",
                    dataset.id, path
                )),
                other => other,
            })?;

        let run = self
            .run_pipeline(dataset.clone(), bytes, record.format, request.operations)
            .await?;

        if let Some(error) = run.status.error() {
            match self.recorder.record_failed(dataset.id, &run, error).await {
                Ok(run_id) => {
                    warn!("Cleaning run {} for dataset {} failed: {}", run_id, dataset.id, error)
                }
                Err(record_error) => error!(
                    "Cleaning run for dataset {} failed ({}) and could not be recorded: {}",
                    dataset.id, error, record_error
                ),
            }
        }
        if let RunStatus::Failed(error) = run.status {
            return Err(error);
        }

        let artifacts = self.publisher.publish(&dataset, &run).await?;
        let run_id = self
            .recorder
            .record_completed(dataset.id, &run, &artifacts)
            .await?;

        Ok(CleaningSummary {
            run_id,
            operations: run.results,
            total_rows_affected: run.total_rows_affected,
            clean_url: artifacts.clean.url,
            duplicates_url: artifacts.duplicates.map(|d| d.location.url),
        })
    }

    async fn run_pipeline(
        &self,
        dataset: DatasetRef,
        bytes: Vec<u8>,
        format: DataFormat,
        operations: Vec<OperationDescriptor>,
    ) -> Result<PipelineRun> {
        let pipeline = self.pipeline.clone();
        let options = self.load_options.clone();

        tokio::task::spawn_blocking(move || -> Result<PipelineRun> {
            let frame = Frame::load_with(&bytes, format, &options)?;
            Ok(pipeline.run(dataset, frame, &operations))
        })
        .await
        .map_err(|e| CleanerError::internal(format!("cleaning task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests;
