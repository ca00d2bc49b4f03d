use super::*;
use crate::catalog::MemoryCatalog;
use crate::error::ErrorKind;
use crate::storage::MemoryBlobStore;
use async_trait::async_trait;
use serde_json::{Value, json};

struct Harness {
    store: Arc<MemoryBlobStore>,
    catalog: Arc<MemoryCatalog>,
    service: CleaningService,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryBlobStore::new());
    let catalog = Arc::new(MemoryCatalog::new());
    let service = CleaningService::new(store.clone(), catalog.clone());
    Harness {
        store,
        catalog,
        service,
    }
}

/// Catalog whose `cleaning_runs` table rejects every insert
#[derive(Default)]
struct RunsUnavailableCatalog {
    inner: MemoryCatalog,
}

#[async_trait]
impl MetadataCatalog for RunsUnavailableCatalog {
    async fn insert(&self, table: &str, record: Value) -> Result<Value> {
        if table == tables::CLEANING_RUNS {
            return Err(CleanerError::catalog(table, "table is read-only"));
        }
        self.inner.insert(table, record).await
    }

    async fn update(&self, table: &str, id: i64, fields: Value) -> Result<Value> {
        self.inner.update(table, id, fields).await
    }

    async fn query(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>> {
        self.inner.query(table, filters, order).await
    }
}

fn request(dataset_id: i64, operations: serde_json::Value) -> CleaningRequest {
    serde_json::from_value(json!({"dataset_id": dataset_id, "operations": operations})).unwrap()
}

#[tokio::test]
async fn test_register_dataset() {
    let h = harness();

    let dataset = h
        .service
        .register_dataset("sales.csv", b"region,units\nnorth,1\nsouth,2\n".to_vec())
        .await
        .unwrap();

    assert_eq!(dataset.id, 1);
    assert_eq!(dataset.storage_path, "datasets/sales.csv");
    assert_eq!(dataset.format, DataFormat::Csv);
    assert_eq!((dataset.row_count, dataset.column_count), (2, 2));
    assert_eq!(dataset.metadata["columns"][1]["kind"], json!("integer"));
    assert!(h.store.get("datasets/sales.csv").await.is_ok());
    assert_eq!(h.service.dataset(1).await.unwrap(), dataset);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let h = harness();

    let unsupported = h.service.register_dataset("sales.xlsx", b"x".to_vec()).await;
    assert_eq!(unsupported.unwrap_err().kind(), ErrorKind::Format);

    let nested = h.service.register_dataset("a/b.csv", b"x\n1\n".to_vec()).await;
    assert_eq!(nested.unwrap_err().kind(), ErrorKind::InvalidParameter);

    let malformed = h.service.register_dataset("broken.json", b"{not json".to_vec()).await;
    assert_eq!(malformed.unwrap_err().kind(), ErrorKind::Format);

    assert!(h.store.paths().await.is_empty());
    assert!(h.service.list_datasets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clean_dataset_publishes_and_records() {
    let h = harness();
    let dataset = h
        .service
        .register_dataset(
            "sales.json",
            br#"[{"x": 1}, {"x": 2}, {"x": 2}, {"x": null}]"#.to_vec(),
        )
        .await
        .unwrap();

    let summary = h
        .service
        .clean_dataset(request(
            dataset.id,
            json!([{"kind": "deduplicate"}, {"kind": "fill_nulls"}]),
        ))
        .await
        .unwrap();

    assert_eq!(summary.total_rows_affected, 2);
    assert_eq!(summary.clean_url, "memory://clean/clean_sales.json");
    assert_eq!(
        summary.duplicates_url.as_deref(),
        Some("memory://duplicates/duplicates_sales.json")
    );

    let clean = String::from_utf8(h.store.get("clean/clean_sales.json").await.unwrap()).unwrap();
    assert_eq!(clean.lines().collect::<Vec<_>>(), vec!["x", "1", "2", "0"]);

    let runs = h.service.list_runs().await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].id, summary.run_id);
    assert_eq!(
        h.catalog.query(tables::DUPLICATE_SETS, &[], None).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_clean_dataset_failure_writes_notice_only() {
    let h = harness();
    let dataset = h
        .service
        .register_dataset("people.csv", b"name,age\nann,30\nann,30\nbob,40\n".to_vec())
        .await
        .unwrap();

    let error = h
        .service
        .clean_dataset(request(
            dataset.id,
            json!([
                {"kind": "deduplicate"},
                {"kind": "remove_outliers", "parameters": {"columns": ["name"]}}
            ]),
        ))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ColumnType);
    assert_eq!(h.store.paths().await, vec!["datasets/people.csv".to_string()]);
    assert!(h.catalog.query(tables::DUPLICATE_SETS, &[], None).await.unwrap().is_empty());

    let runs = h.service.list_runs().await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "Failed");
    assert_eq!(runs[0].operations.len(), 1);
    assert_eq!(runs[0].rows_affected, 1);
}

#[tokio::test]
async fn test_clean_dataset_failure_survives_unrecordable_notice() {
    let store = Arc::new(MemoryBlobStore::new());
    let service = CleaningService::new(store.clone(), Arc::new(RunsUnavailableCatalog::default()));
    let dataset = service
        .register_dataset("people.csv", b"name,age\nann,30\nbob,40\n".to_vec())
        .await
        .unwrap();

    let error = service
        .clean_dataset(request(
            dataset.id,
            json!([{"kind": "remove_outliers", "parameters": {"columns": ["name"]}}]),
        ))
        .await
        .unwrap_err();

    assert!(matches!(error, CleanerError::ColumnType { ref column, .. } if column == "name"));
    assert_eq!(store.paths().await, vec!["datasets/people.csv".to_string()]);
}

#[tokio::test]
async fn test_clean_dataset_rejects_unknown_or_empty_requests() {
    let h = harness();

    let missing = h
        .service
        .clean_dataset(request(404, json!([{"kind": "deduplicate"}])))
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::MissingInput);

    let empty = h.service.clean_dataset(request(1, json!([]))).await.unwrap_err();
    assert_eq!(empty.kind(), ErrorKind::InvalidParameter);

    assert!(h.service.list_runs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clean_dataset_with_missing_blob() {
    let h = harness();
    h.catalog
        .insert(
            tables::DATASETS,
            json!({
                "name": "ghost.csv",
                "storage_path": "datasets/ghost.csv",
                "format": "csv",
                "row_count": 0,
                "column_count": 0,
                "uploaded_at": "2024-01-01T00:00:00Z",
            }),
        )
        .await
        .unwrap();

    let error = h
        .service
        .clean_dataset(request(1, json!([{"kind": "deduplicate"}])))
        .await
        .unwrap_err();

    assert!(matches!(error, CleanerError::MissingInput { .. }));
}
