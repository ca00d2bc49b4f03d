//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `TABCLEAN_*` environment variables. Command-line overrides are applied
//! last by the CLI through the `with_*` builders.

use crate::constants::{
    APP_DIR_NAME, CATALOG_FILE_NAME, CONFIG_FILE_NAME, DEFAULT_INFER_SCHEMA_LENGTH,
    DEFAULT_OUTLIER_THRESHOLD, env,
};
use crate::error::{CleanerError, Result};
use crate::frame::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Root directory of the local blob store
    pub storage_root: PathBuf,

    /// Catalog file; defaults to `catalog.json` inside the storage root
    pub catalog_path: Option<PathBuf>,

    /// Base URL under which published artifacts are reachable
    pub public_base_url: Option<String>,

    /// IQR multiplier used when an outlier operation does not specify one
    pub outlier_threshold: f64,

    /// Rows scanned to infer CSV column kinds
    pub infer_schema_length: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            catalog_path: None,
            public_base_url: None,
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

/// Platform data directory for blobs and the catalog
pub fn default_storage_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR_NAME)))
}

/// Platform config file location, if a config directory exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl CleanerConfig {
    /// Defaults overlaid with the config file and the process environment
    ///
    /// An explicitly given file must exist. Without one, the platform config
    /// file is read when present.
    pub fn load_layered(file: Option<&Path>) -> Result<Self> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        let config = config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CleanerError::io(path, e))?;
        let config = toml::from_str(&text).map_err(|e| {
            CleanerError::configuration(format!("invalid config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Overlay variables resolved through `lookup`
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(env::STORAGE_ROOT) {
            self.storage_root = PathBuf::from(root);
        }
        if let Some(path) = lookup(env::CATALOG_PATH) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(env::PUBLIC_BASE_URL) {
            self.public_base_url = Some(url);
        }
        if let Some(threshold) = lookup(env::OUTLIER_THRESHOLD) {
            self.outlier_threshold = threshold.trim().parse().map_err(|e| {
                CleanerError::configuration(format!(
                    "{} must be a number, got '{}': {}",
                    env::OUTLIER_THRESHOLD,
                    threshold,
                    e
                ))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.outlier_threshold.is_finite() || self.outlier_threshold <= 0.0 {
            return Err(CleanerError::configuration(format!(
                "outlier_threshold must be positive, got {}",
                self.outlier_threshold
            )));
        }
        if self.infer_schema_length == 0 {
            return Err(CleanerError::configuration(
                "infer_schema_length must be at least 1",
            ));
        }
        if self.storage_root.as_os_str().is_empty() {
            return Err(CleanerError::configuration("storage_root must not be empty"));
        }
        Ok(())
    }

    /// Catalog file in effect
    pub fn catalog_file(&self) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| self.storage_root.join(CATALOG_FILE_NAME))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = threshold;
        self
    }
}
