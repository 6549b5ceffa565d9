//! json2xls CLI - convert a JSON `{"rows": [[...]]}` document to an .xls workbook

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "json2xls")]
#[command(
    author,
    version,
    about = "Convert JSON row data into a legacy Excel (.xls) workbook"
)]
struct Cli {
    /// Input JSON file: {"rows": [[cell, ...], ...]}
    input_json: PathBuf,

    /// Output .xls file (replaced if it exists)
    output_xls: PathBuf,

    /// Log more to stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout; usage errors to stderr
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(rows) => {
            println!("Generated XLS with {rows} rows");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<usize> {
    tracing::debug!(
        input = %cli.input_json.display(),
        output = %cli.output_xls.display(),
        "converting"
    );
    let rows = json2xls::convert(&cli.input_json, &cli.output_xls)?;
    Ok(rows)
}

/// Send `tracing` (and bridged `log`) output to stderr so stdout only ever
/// carries the confirmation line.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
