//! # Validate Command
//!
//! Locates the project root, runs the dataset validation, prints the report
//! and returns the exit status.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use verbset_core::{DatasetLayout, ValidationReport};
use verbset_integrity::validate_dataset;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report.
    #[default]
    Text,
    /// Pretty-printed JSON report.
    Json,
}

/// Arguments for validation.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Project root containing `data/` and `schemas/`. Parent directories
    /// are searched if this directory is not itself a root.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Render `report` in the requested format.
pub fn render_report(report: &ValidationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => {
            let mut json = report.to_json().context("failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Validate the dataset and return the rendered report with its exit status.
///
/// # Errors
///
/// Returns an error if a schema contract exists but cannot be parsed or
/// compiled, or if the report cannot be serialized.
pub fn validate(args: &ValidateArgs) -> Result<(String, u8)> {
    let root = crate::find_project_root(&args.root);
    tracing::debug!(root = %root.display(), "resolved project root");

    let layout = DatasetLayout::new(root);
    let report = validate_dataset(&layout).context("failed to load schema contracts")?;
    let rendered = render_report(&report, args.format)?;
    Ok((rendered, report.exit_code()))
}

/// Execute validation, printing the report to stdout.
///
/// Returns exit code: 0 when no ERROR issue was found, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let (rendered, code) = validate(args)?;
    print!("{rendered}");
    Ok(code)
}
