//! `register` command: upload a file and record it as a dataset

use super::shared::print_json;
use crate::cli::args::{OutputFormat, RegisterArgs};
use crate::error::{CleanerError, Result};
use crate::service::CleaningService;
use colored::*;
use tracing::info;

pub async fn run_register(
    service: &CleaningService,
    args: &RegisterArgs,
    output_format: OutputFormat,
) -> Result<()> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .file
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .ok_or_else(|| {
                CleanerError::invalid_parameter(
                    "file",
                    format!("{} has no usable file name", args.file.display()),
                )
            })?,
    };

    let bytes = tokio::fs::read(&args.file)
        .await
        .map_err(|e| CleanerError::io(&args.file, e))?;
    info!("Registering {} ({} bytes) as '{}'", args.file.display(), bytes.len(), name);

    let dataset = service.register_dataset(&name, bytes).await?;

    match output_format {
        OutputFormat::Json => print_json(&dataset)?,
        OutputFormat::Human => {
            println!(
                "{} dataset {} {}",
                "Registered".bright_green().bold(),
                dataset.id.to_string().bright_yellow().bold(),
                dataset.name.bright_cyan()
            );
            println!(
                "  {} rows x {} columns, stored at {}",
                dataset.row_count,
                dataset.column_count,
                dataset.storage_path.bright_black()
            );
        }
    }
    Ok(())
}
