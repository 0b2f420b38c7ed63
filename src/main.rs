//! logicdef command line interface
//!
//! Usage:
//!   logicdef [OPTIONS] <input-file>
//!   logicdef --help
//!
//! Examples:
//!   logicdef circuit.def               # Parse and report diagnostics
//!   logicdef -v circuit.def            # With parser progress logging
//!   logicdef --emit=json circuit.def   # Machine-readable diagnostics

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// logicdef - circuit definition language frontend
#[derive(Parser, Debug)]
#[command(name = "logicdef")]
#[command(version)]
#[command(about = "Parses a circuit definition file and reports every error in one pass", long_about = None)]
struct Cli {
    /// Definition file to parse
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// What to emit
    #[arg(long, default_value = "text")]
    emit: EmitKind,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress warnings)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmitKind {
    /// One line per diagnostic
    Text,
    /// The full parse outcome as JSON
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    info!("logicdef v{}", logicdef::VERSION);
    debug!("Input file: {:?}", cli.input);

    let circuit = logicdef::parse_file(&cli.input)
        .with_context(|| format!("Failed to scan {:?}", cli.input))?;
    let outcome = &circuit.outcome;

    match cli.emit {
        EmitKind::Text => {
            for diagnostic in &outcome.diagnostics {
                // Positions are 0-based internally; report them 1-based.
                println!(
                    "{}:{}:{}: {}",
                    cli.input.display(),
                    diagnostic.line + 1,
                    diagnostic.column + 1,
                    diagnostic.message
                );
            }
            if outcome.success {
                println!(
                    "Parsed {} device(s), {} connection(s), {} monitor(s)",
                    circuit.devices.device_count(),
                    circuit.network.connections().len(),
                    circuit.monitors.monitors().len()
                );
            } else {
                println!("{} error(s) found", outcome.error_count);
            }
        }
        EmitKind::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
    }

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
