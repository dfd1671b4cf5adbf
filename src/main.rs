use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use statement_converter::{convert, default_cutoff, ConversionRequest, OutputTarget, SourceType};

#[derive(Parser, Debug)]
#[command(name = "statement-converter")]
#[command(version, about = "Convert bank statement CSV exports for Wave / FreeAgent import")]
struct Cli {
    /// Path for file to be converted
    #[arg(long)]
    path: PathBuf,

    /// Institution that produced the file (airwallex, currenxie, erstebank, neat, payoneer, revolut, starling, wise)
    #[arg(long = "type", value_parser = parse_source)]
    source: SourceType,

    /// Target platform (wave, freeagent)
    #[arg(long, default_value = "wave", value_parser = parse_target)]
    target: OutputTarget,

    /// Is a reimbursement account?
    #[arg(long)]
    reimbursement: bool,

    /// Only convert transactions after this date (YYYY-MM-DD)
    #[arg(long = "from", value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Overwrite an existing output file without asking
    #[arg(long, short = 'y')]
    yes: bool,
}

fn parse_source(s: &str) -> Result<SourceType, String> {
    s.parse().map_err(|e: statement_converter::ConvertError| e.to_string())
}

fn parse_target(s: &str) -> Result<OutputTarget, String> {
    s.parse().map_err(|e: statement_converter::ConvertError| e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn init_logging() {
    // Logs go to stderr; stdout is for the user-facing result line
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("statement_converter=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn ask_overwrite(path: &Path) -> bool {
    print!(
        "Target file '{}' already exists. Do you want to overwrite? [y/N]: ",
        path.display()
    );
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let cutoff = cli
        .from
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or_else(default_cutoff);

    let request = ConversionRequest::new(&cli.path, cli.source, cli.target)
        .with_reimbursement(cli.reimbursement)
        .with_cutoff(cutoff);

    let yes = cli.yes;
    let summary = convert(&request, |path| yes || ask_overwrite(path))
        .with_context(|| format!("converting {}", cli.path.display()))?;

    println!(
        "Done. Converted csv written to\n{}.",
        summary.output.display()
    );

    Ok(())
}
