//! Pattern command - compile a date/time format pattern to its regex.

use clap::Args;

use pluck_core::pattern_to_regex;

/// Arguments for the pattern command.
#[derive(Args)]
pub struct PatternArgs {
    /// Format pattern, e.g. "dd/MM/yyyy HH:mm"
    pattern: String,
}

pub fn run(args: PatternArgs) -> anyhow::Result<()> {
    println!("{}", pattern_to_regex(&args.pattern)?);
    Ok(())
}
