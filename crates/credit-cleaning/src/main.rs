//! CLI entry point for the credit request cleaning pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use credit_cleaning::{CleaningConfig, RequestCleaner, RequestTable, load_requests};
use dotenv::dotenv;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Credit request data cleaning",
    long_about = "Cleans a semicolon-separated table of credit requests: drops incomplete \
                  rows, normalizes labels, text, districts, dates and amounts, then drops \
                  duplicate rows.\n\n\
                  EXAMPLES:\n  \
                  # Clean the default file and preview the result\n  \
                  credit-cleaning\n\n  \
                  # Write the cleaned table\n  \
                  credit-cleaning -i solicitudes_credito.csv -o cleaned.csv\n\n  \
                  # Machine-readable summary\n  \
                  credit-cleaning -i data.csv --json"
)]
struct Args {
    /// Path to the credit request file
    #[arg(short, long, default_value = "solicitudes_credito.csv")]
    input: String,

    /// Write the cleaned table to this CSV file
    #[arg(short, long)]
    output: Option<String>,

    /// JSON file with a cleaning configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Number of cleaned rows to print (0 disables the preview)
    #[arg(long, default_value = "10")]
    preview: usize,

    /// Output a JSON summary to stdout instead of the human-readable one
    ///
    /// Disables all progress logs.
    #[arg(long)]
    json: bool,
}

/// Summary of one cleaning run.
#[derive(Debug, Serialize)]
struct RunSummary {
    input: String,
    output: Option<String>,
    rows_before: usize,
    rows_after: usize,
    rows_removed: usize,
    columns: Vec<String>,
    categorical_columns: Vec<String>,
    duration_ms: u128,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Load .env first so RUST_LOG from it reaches the filter
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = load_config(args.config.as_deref())?;
    let start = Instant::now();

    let raw = load_requests(&args.input, &config)
        .with_context(|| format!("Failed to load {}", args.input))?;
    info!("Dataset loaded successfully: {:?}", raw.frame().shape());

    let cleaned = RequestCleaner::new(config.clone())
        .clean(&raw)
        .context("Cleaning failed")?;

    if let Some(ref output) = args.output {
        write_csv(&cleaned, output, config.separator)?;
        info!("Cleaned table written to: {}", output);
    }

    let summary = RunSummary {
        input: args.input.clone(),
        output: args.output.clone(),
        rows_before: raw.height(),
        rows_after: cleaned.height(),
        rows_removed: raw.height() - cleaned.height(),
        columns: cleaned.field_names(),
        categorical_columns: cleaned.categorical_columns().map(str::to_string).collect(),
        duration_ms: start.elapsed().as_millis(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_human_readable_summary(&summary, &cleaned, args.preview);
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<CleaningConfig> {
    let Some(path) = path else {
        return Ok(CleaningConfig::default());
    };

    let config = CleaningConfig::from_json_file(path)
        .with_context(|| format!("Failed to load config file {}", path))?;
    info!("Using configuration from: {}", path);
    Ok(config)
}

fn write_csv(table: &RequestTable, path: &str, separator: u8) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut frame = table.frame().clone();
    let mut file =
        File::create(path).with_context(|| format!("Failed to create output file {}", path))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .with_quote_char(b'"')
        .finish(&mut frame)?;
    Ok(())
}

/// Print a human-readable summary of the cleaning run.
///
/// Uses `println!` rather than logging so it stays visible at any log level.
fn print_human_readable_summary(summary: &RunSummary, cleaned: &RequestTable, preview: usize) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Input:  {}", summary.input);
    if let Some(ref output) = summary.output {
        println!("Output: {}", output);
    }
    println!(
        "Rows: {} -> {} ({} removed)",
        summary.rows_before, summary.rows_after, summary.rows_removed
    );
    println!("Duration: {}ms", summary.duration_ms);
    if !summary.categorical_columns.is_empty() {
        println!("Categorical: {}", summary.categorical_columns.join(", "));
    }
    println!();

    if preview > 0 {
        println!("{}", cleaned.frame().head(Some(preview)));
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
