//! Check command - validate a delimited file against column rules.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use pluck_core::{ValidationOptions, validate_delimited};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Delimited text file to validate
    input: PathBuf,

    /// JSON file with validation options and column rules
    #[arg(short, long)]
    rules: PathBuf,

    /// Report every issue instead of stopping at the first
    #[arg(long)]
    report_all: bool,

    /// Print issues as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.input)?;
    let mut options: ValidationOptions = serde_json::from_str(&fs::read_to_string(&args.rules)?)?;
    if args.report_all {
        options.report_all = true;
    }

    let issues = validate_delimited(&text, &options)?;
    info!("{} issue(s) in {}", issues.len(), args.input.display());

    if args.json {
        println!("{}", serde_json::to_string(&issues)?);
    } else {
        for issue in &issues {
            match (issue.line, issue.column) {
                (Some(line), Some(column)) => {
                    println!("line {line}, column {column}: {}", issue.message);
                }
                _ => println!("{}", issue.message),
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} validation issue(s) found", issues.len())
    }
}
