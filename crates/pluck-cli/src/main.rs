//! CLI application for extracting typed values from noisy text.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{check, get, pattern};

/// Extract typed values, compiled patterns, and validation reports from text
#[derive(Parser)]
#[command(name = "pluck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a typed value from text
    Get(get::GetArgs),

    /// Compile a date/time format pattern to its regex
    Pattern(pattern::PatternArgs),

    /// Validate a delimited file against column rules
    Check(check::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Get(args) => get::run(args),
        Commands::Pattern(args) => pattern::run(args),
        Commands::Check(args) => check::run(args),
    }
}
