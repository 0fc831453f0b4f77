//! Get command - extract a typed value from text.

use std::io::Read;

use clap::Args;
use regex::Regex;
use tracing::debug;

use pluck_core::{Extractor, Prefilter, TargetType};

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Text to extract from; reads stdin when omitted
    text: Option<String>,

    /// Target type, e.g. int, float, bool, nullable<int>, list<datetime>
    #[arg(short = 't', long = "into", default_value = "text")]
    into: String,

    /// Date/time format pattern, e.g. "dd/MM/yyyy HH:mm"
    #[arg(short, long)]
    format: Option<String>,

    /// Keep only the first match of this regex before extracting
    #[arg(long, conflicts_with = "strip")]
    select: Option<String>,

    /// Remove every match of this regex before extracting
    #[arg(long)]
    strip: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: GetArgs) -> anyhow::Result<()> {
    let target: TargetType = args.into.parse()?;

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut extractor = Extractor::new();
    if let Some(format) = args.format.as_deref() {
        extractor = extractor.with_format(format);
    }
    if let Some(select) = args.select.as_deref() {
        extractor = extractor.with_prefilter(Prefilter::Select(Regex::new(select)?));
    } else if let Some(strip) = args.strip.as_deref() {
        extractor = extractor.with_prefilter(Prefilter::Remove(Regex::new(strip)?));
    }

    debug!("extracting {} from {} chars of input", target, text.len());
    let value = extractor.extract_value(&text, target)?;

    if args.json {
        println!("{}", serde_json::to_string(&value)?);
    } else {
        println!("{value}");
    }

    Ok(())
}
