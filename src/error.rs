//! Error handling for cleaning runs and their collaborators.
//!
//! Every error carries a human-readable message and an [`ErrorKind`] that is
//! independent of any transport, so a boundary layer can map kinds to its own
//! status codes.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Unsupported or unparseable input format: {message}")]
    Format { message: String },

    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    #[error("Column '{column}' has kind {kind} but {operation} requires a numeric column")]
    ColumnType {
        column: String,
        kind: String,
        operation: String,
    },

    #[error("Dataset could not be resolved: {reference}")]
    MissingInput { reference: String },

    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("Blob not found: {path}")]
    BlobNotFound { path: String },

    #[error("Blob store error at '{path}': {message}")]
    Store { path: String, message: String },

    #[error("Metadata catalog error on table '{table}': {message}")]
    Catalog { table: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Transport-agnostic classification of a [`CleanerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Format,
    ColumnNotFound,
    ColumnType,
    MissingInput,
    InvalidParameter,
    Store,
    Catalog,
    Configuration,
    Internal,
}

impl CleanerError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    pub fn column_type(
        column: impl Into<String>,
        kind: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::ColumnType {
            column: column.into(),
            kind: kind.into(),
            operation: operation.into(),
        }
    }

    pub fn missing_input(reference: impl Into<String>) -> Self {
        Self::MissingInput {
            reference: reference.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub fn store(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn catalog(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify this error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format { .. } => ErrorKind::Format,
            Self::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            Self::ColumnType { .. } => ErrorKind::ColumnType,
            Self::MissingInput { .. } | Self::BlobNotFound { .. } => ErrorKind::MissingInput,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Store { .. } | Self::Io { .. } => ErrorKind::Store,
            Self::Catalog { .. } => ErrorKind::Catalog,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Polars(_) | Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanerError>;
