//! `clean` command: run an operation list against a dataset

use super::shared::{create_spinner, print_json};
use crate::cli::args::{Args, CleanArgs, OutputFormat};
use crate::cli::input::{describe_parameters, load_operations_file, parse_operation_spec};
use crate::error::Result;
use crate::models::{CleaningRequest, CleaningSummary, OperationDescriptor};
use crate::service::CleaningService;
use colored::*;
use indicatif::HumanDuration;
use std::time::Instant;
use tracing::debug;

/// Operations from the file when given, otherwise from the inline specs
pub fn collect_operations(args: &CleanArgs) -> Result<Vec<OperationDescriptor>> {
    match &args.operations_file {
        Some(path) => load_operations_file(path),
        None => args
            .operations
            .iter()
            .map(|spec| parse_operation_spec(spec))
            .collect(),
    }
}

pub async fn run_clean(service: &CleaningService, args: &CleanArgs, global: &Args) -> Result<()> {
    let operations = collect_operations(args)?;
    debug!("Requested operations: {:?}", operations);

    let request = CleaningRequest {
        dataset_id: args.dataset_id,
        operations,
    };

    let start = Instant::now();
    let spinner = create_spinner(
        global.show_progress(),
        &format!("Cleaning dataset {}...", args.dataset_id),
    );

    let result = service.clean_dataset(request).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let summary = result?;

    match global.output_format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Human => print_summary(&summary, start),
    }
    Ok(())
}

fn print_summary(summary: &CleaningSummary, start: Instant) {
    println!(
        "{} run {} in {}",
        "Completed".bright_green().bold(),
        summary.run_id.to_string().bright_yellow().bold(),
        HumanDuration(start.elapsed())
    );

    for (index, operation) in summary.operations.iter().enumerate() {
        let parameters = describe_parameters(&operation.parameters);
        println!(
            "  {}. {} {} {}",
            index + 1,
            operation.kind.bright_cyan(),
            if parameters.is_empty() {
                String::new()
            } else {
                format!("({})", parameters).bright_black().to_string()
            },
            format!("{} affected", operation.rows_affected).bright_white()
        );
    }

    println!(
        "  {} {}",
        "Total affected:".bright_white(),
        summary.total_rows_affected.to_string().bright_yellow()
    );
    println!("  {} {}", "Clean data:".bright_white(), summary.clean_url);
    if let Some(url) = &summary.duplicates_url {
        println!("  {} {}", "Duplicates:".bright_white(), url);
    }
}
