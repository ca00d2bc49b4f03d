//! `datasets` and `runs` commands

use super::shared::{display_timestamp, print_json};
use crate::cli::args::{OutputFormat, RunsArgs};
use crate::error::Result;
use crate::recorder::RunRecord;
use crate::service::CleaningService;
use colored::*;

pub async fn run_datasets(service: &CleaningService, output_format: OutputFormat) -> Result<()> {
    let datasets = service.list_datasets().await?;

    if output_format == OutputFormat::Json {
        return print_json(&datasets);
    }

    if datasets.is_empty() {
        println!("{}", "No datasets registered".bright_black());
        return Ok(());
    }

    println!("{}", "Registered datasets:".bright_green().bold());
    for dataset in &datasets {
        println!(
            "  {} {} {} {}",
            format!("{:>4}", dataset.id).bright_yellow().bold(),
            dataset.name.bright_cyan(),
            format!("({} rows x {} cols, {})", dataset.row_count, dataset.column_count, dataset.format)
                .bright_black(),
            display_timestamp(&dataset.uploaded_at)
        );
    }
    Ok(())
}

pub async fn run_runs(
    service: &CleaningService,
    args: &RunsArgs,
    output_format: OutputFormat,
) -> Result<()> {
    let runs = match args.dataset {
        Some(dataset_id) => service.list_runs_for_dataset(dataset_id).await?,
        None => service.list_runs().await?,
    };

    if output_format == OutputFormat::Json {
        return print_json(&runs);
    }

    if runs.is_empty() {
        println!("{}", "No cleaning runs recorded".bright_black());
        return Ok(());
    }

    println!("{}", "Cleaning runs:".bright_green().bold());
    for run in &runs {
        print_run(run);
    }
    Ok(())
}

fn print_run(run: &RunRecord) {
    let status = if run.is_completed() {
        run.status.bright_green()
    } else {
        run.status.bright_red()
    };
    let kinds: Vec<&str> = run.operations.iter().map(|op| op.kind.as_str()).collect();

    println!(
        "  {} dataset {} {} {} {}",
        format!("{:>4}", run.id).bright_yellow().bold(),
        run.dataset_id,
        status,
        format!("[{}]", kinds.join(", ")).bright_cyan(),
        format!("{} affected, {}", run.rows_affected, display_timestamp(&run.cleaned_at)).bright_black()
    );
    if let Some(error) = &run.error {
        println!("       {}", error.red());
    }
}
