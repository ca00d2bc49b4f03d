//! Command implementations for the tabclean CLI
//!
//! Each subcommand lives in its own module; this module sets up logging,
//! builds the service from the layered configuration and dispatches.

pub mod clean;
pub mod listing;
pub mod register;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::error::Result;
use crate::service::CleaningService;
use shared::setup_logging;
use tracing::debug;

/// Run the command selected by `args`
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args);

    let config = args.load_config()?;
    debug!("Effective configuration: {:?}", config);

    let service = CleaningService::from_config(&config).await?;

    match &args.command {
        Commands::Register(register_args) => {
            register::run_register(&service, register_args, args.output_format).await
        }
        Commands::Clean(clean_args) => clean::run_clean(&service, clean_args, &args).await,
        Commands::Datasets => listing::run_datasets(&service, args.output_format).await,
        Commands::Runs(runs_args) => {
            listing::run_runs(&service, runs_args, args.output_format).await
        }
    }
}
