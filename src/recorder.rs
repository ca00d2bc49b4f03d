//! Catalog records of cleaning runs
//!
//! A completed run writes a `duplicate_sets` record (only when duplicates were
//! published) followed by its `cleaning_runs` record. A failed run writes a
//! single `cleaning_runs` record carrying the error and no artifact paths.

use crate::catalog::{Filter, MetadataCatalog, Order};
use crate::constants::{MULTIPLE_CLEANING_KIND, run_status, tables};
use crate::error::{CleanerError, Result};
use crate::models::OperationResult;
use crate::pipeline::PipelineRun;
use crate::publisher::PublishedArtifacts;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Row of the `cleaning_runs` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: i64,
    pub dataset_id: i64,
    pub cleaning_kind: String,
    pub operations: Vec<OperationResult>,
    pub rows_affected: u64,
    pub clean_path: Option<String>,
    pub duplicates_path: Option<String>,
    pub status: String,
    pub error: Option<String>,
    pub cleaned_at: String,
}

impl RunRecord {
    pub fn from_record(record: &Value) -> Result<Self> {
        serde_json::from_value(record.clone()).map_err(|e| {
            CleanerError::catalog(tables::CLEANING_RUNS, format!("malformed run record: {}", e))
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == run_status::COMPLETED
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn record_id(table: &str, record: &Value) -> Result<i64> {
    record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| CleanerError::catalog(table, "inserted record has no integer id"))
}

pub struct RunRecorder {
    catalog: Arc<dyn MetadataCatalog>,
}

impl RunRecorder {
    pub fn new(catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self { catalog }
    }

    /// Record a completed run and its published artifacts, returning the run id
    pub async fn record_completed(
        &self,
        dataset_id: i64,
        run: &PipelineRun,
        artifacts: &PublishedArtifacts,
    ) -> Result<i64> {
        let now = timestamp();

        if let Some(duplicates) = &artifacts.duplicates {
            let record = self
                .catalog
                .insert(
                    tables::DUPLICATE_SETS,
                    json!({
                        "dataset_id": dataset_id,
                        "duplicates_path": duplicates.location.path,
                        "record_count": duplicates.record_count,
                        "created_at": now,
                    }),
                )
                .await?;
            debug!(
                "Recorded duplicate set {} ({} rows)",
                record_id(tables::DUPLICATE_SETS, &record)?,
                duplicates.record_count
            );
        }

        let record = self
            .catalog
            .insert(
                tables::CLEANING_RUNS,
                json!({
                    "dataset_id": dataset_id,
                    "cleaning_kind": MULTIPLE_CLEANING_KIND,
                    "operations": run.results,
                    "rows_affected": run.total_rows_affected,
                    "clean_path": artifacts.clean.path,
                    "duplicates_path": artifacts.duplicates.as_ref().map(|d| d.location.path.clone()),
                    "status": run_status::COMPLETED,
                    "error": Value::Null,
                    "cleaned_at": now,
                }),
            )
            .await?;

        let run_id = record_id(tables::CLEANING_RUNS, &record)?;
        info!("Recorded completed run {} for dataset {}", run_id, dataset_id);
        Ok(run_id)
    }

    /// Record the failure notice of a run, returning the run id
    pub async fn record_failed(
        &self,
        dataset_id: i64,
        run: &PipelineRun,
        error: &CleanerError,
    ) -> Result<i64> {
        let record = self
            .catalog
            .insert(
                tables::CLEANING_RUNS,
                json!({
                    "dataset_id": dataset_id,
                    "cleaning_kind": MULTIPLE_CLEANING_KIND,
                    "operations": run.results,
                    "rows_affected": run.total_rows_affected,
                    "clean_path": Value::Null,
                    "duplicates_path": Value::Null,
                    "status": run_status::FAILED,
                    "error": error.to_string(),
                    "cleaned_at": timestamp(),
                }),
            )
            .await?;

        let run_id = record_id(tables::CLEANING_RUNS, &record)?;
        info!("Recorded failed run {} for dataset {}", run_id, dataset_id);
        Ok(run_id)
    }

    /// Completed runs, most recent first
    pub async fn completed_runs(&self) -> Result<Vec<RunRecord>> {
        self.runs(&[Filter::eq("status", run_status::COMPLETED)]).await
    }

    /// Every run of one dataset, most recent first
    pub async fn runs_for_dataset(&self, dataset_id: i64) -> Result<Vec<RunRecord>> {
        self.runs(&[Filter::eq("dataset_id", dataset_id)]).await
    }

    /// Every run, most recent first
    pub async fn all_runs(&self) -> Result<Vec<RunRecord>> {
        self.runs(&[]).await
    }

    async fn runs(&self, filters: &[Filter]) -> Result<Vec<RunRecord>> {
        self.catalog
            .query(
                tables::CLEANING_RUNS,
                filters,
                Some(&Order::descending("cleaned_at")),
            )
            .await?
            .iter()
            .map(RunRecord::from_record)
            .collect()
    }
}
