//! Command-line argument definitions for tabclean
//!
//! Global options select the configuration layers and the log level; each
//! subcommand maps onto one cleaning service operation.

use crate::config::CleanerConfig;
use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Clean tabular CSV/JSON datasets and publish the results
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tabclean",
    version,
    about = "Clean tabular CSV/JSON datasets with deduplication, null filling and outlier removal",
    long_about = "Registers CSV or JSON datasets in a local store, runs ordered cleaning \
                  operations against them and publishes the cleaned data together with the \
                  removed duplicates as CSV artifacts. Every run is recorded in a metadata \
                  catalog."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML); defaults to the platform config directory
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the blob store
    #[arg(long = "storage-root", value_name = "PATH", global = true)]
    pub storage_root: Option<PathBuf>,

    /// Catalog file; defaults to catalog.json inside the storage root
    #[arg(long = "catalog", value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Upload a CSV or JSON file and register it as a dataset
    Register(RegisterArgs),
    /// Run cleaning operations against a registered dataset
    Clean(CleanArgs),
    /// List registered datasets, most recent first
    Datasets,
    /// List cleaning runs, most recent first
    Runs(RunsArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct RegisterArgs {
    /// File to upload (.csv or .json)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Dataset name; defaults to the file name
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct CleanArgs {
    /// Identifier of the registered dataset
    #[arg(value_name = "DATASET_ID")]
    pub dataset_id: i64,

    /// Operation as `kind[:key=value;key=value]`, repeatable and applied in order
    ///
    /// Example: `--op deduplicate --op remove_outliers:columns=units,revenue;threshold=2`
    #[arg(long = "op", value_name = "SPEC")]
    pub operations: Vec<String>,

    /// JSON file holding a list of `{kind, parameters}` operations
    #[arg(long = "operations-file", value_name = "FILE", conflicts_with = "operations")]
    pub operations_file: Option<PathBuf>,

    /// Default IQR multiplier for outlier operations without a threshold
    #[arg(long = "threshold", value_name = "FACTOR")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Parser)]
pub struct RunsArgs {
    /// Only show runs of this dataset
    #[arg(long = "dataset", value_name = "DATASET_ID")]
    pub dataset: Option<i64>,
}

/// Output format options for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress spinners only make sense for interactive human output
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    /// Layered configuration with command-line overrides applied last
    pub fn load_config(&self) -> Result<CleanerConfig> {
        let mut config = CleanerConfig::load_layered(self.config.as_deref())?;

        if let Some(root) = &self.storage_root {
            config = config.with_storage_root(root);
        }
        if let Some(catalog) = &self.catalog {
            config = config.with_catalog_path(catalog);
        }
        if let Commands::Clean(CleanArgs {
            threshold: Some(threshold),
            ..
        }) = &self.command
        {
            config = config.with_outlier_threshold(*threshold);
        }

        config.validate()?;
        Ok(config)
    }
}
