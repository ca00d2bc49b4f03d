//! tabclean library
//!
//! A cleaning engine for tabular CSV and JSON datasets. A cleaning run applies
//! an ordered list of operations to one dataset:
//! - exact-duplicate removal, keeping the first occurrence of each row
//! - null filling with `"N/A"` for text columns and `0` for numeric ones
//! - IQR outlier removal over selected numeric columns
//!
//! The cleaned data and the removed duplicates are published as CSV artifacts
//! to a blob store, and every run is recorded in a metadata catalog. Stores
//! and catalogs sit behind the [`storage::BlobStore`] and
//! [`catalog::MetadataCatalog`] traits so the engine runs the same against
//! in-memory collaborators and the local filesystem.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod models;
pub mod operations;
pub mod pipeline;
pub mod publisher;
pub mod recorder;
pub mod service;
pub mod storage;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use config::CleanerConfig;
pub use error::{CleanerError, ErrorKind, Result};
pub use frame::{DataFormat, Frame};
pub use models::{CleaningRequest, CleaningSummary, OperationDescriptor, OperationResult};
pub use pipeline::{CleaningPipeline, PipelineRun, RunStatus};
pub use service::CleaningService;
