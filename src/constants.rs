//! Application constants for tabclean
//!
//! Placeholders, defaults, catalog table names and artifact path layout used
//! throughout the cleaning engine.

// =============================================================================
// Cleaning Defaults
// =============================================================================

/// Placeholder written into null cells of textual columns
pub const TEXT_NULL_PLACEHOLDER: &str = "N/A";

/// Numeric value written into null cells of non-textual columns
pub const NUMERIC_NULL_PLACEHOLDER: i32 = 0;

/// Default IQR multiplier for outlier bounds
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 1.5;

/// Lower quartile used for outlier bounds
pub const LOWER_QUARTILE: f64 = 0.25;

/// Upper quartile used for outlier bounds
pub const UPPER_QUARTILE: f64 = 0.75;

/// Rows scanned when inferring CSV column kinds
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 100;

/// CSV field values read as missing, in addition to empty fields
pub const CSV_NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// =============================================================================
// Operation Parameters
// =============================================================================

pub mod parameters {
    pub const COLUMNS: &str = "columns";
    pub const COLUMNS_ALIAS: &str = "columnas";
    pub const THRESHOLD: &str = "threshold";
    pub const THRESHOLD_ALIAS: &str = "umbral";
}

// =============================================================================
// Catalog Layout
// =============================================================================

pub mod tables {
    /// Registered datasets
    pub const DATASETS: &str = "datasets";

    /// One record per cleaning invocation
    pub const CLEANING_RUNS: &str = "cleaning_runs";

    /// One record per published duplicates artifact
    pub const DUPLICATE_SETS: &str = "duplicate_sets";
}

/// Cleaning kind recorded for multi-operation runs
pub const MULTIPLE_CLEANING_KIND: &str = "multiple";

pub mod run_status {
    pub const COMPLETED: &str = "Completed";
    pub const FAILED: &str = "Failed";
}

// =============================================================================
// Blob Layout
// =============================================================================

/// Prefix for raw uploaded datasets
pub const DATASETS_PREFIX: &str = "datasets";

/// Prefix for cleaned artifacts
pub const CLEAN_PREFIX: &str = "clean";

/// Prefix for duplicates artifacts
pub const DUPLICATES_PREFIX: &str = "duplicates";

/// Content type of every published artifact
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Content type of uploaded JSON datasets
pub const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// Environment
// =============================================================================

pub mod env {
    pub const STORAGE_ROOT: &str = "TABCLEAN_STORAGE_ROOT";
    pub const CATALOG_PATH: &str = "TABCLEAN_CATALOG_PATH";
    pub const PUBLIC_BASE_URL: &str = "TABCLEAN_PUBLIC_BASE_URL";
    pub const OUTLIER_THRESHOLD: &str = "TABCLEAN_OUTLIER_THRESHOLD";
}

/// Application directory name under the user's config/data directories
pub const APP_DIR_NAME: &str = "tabclean";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Catalog file name inside the storage root
pub const CATALOG_FILE_NAME: &str = "catalog.json";
