//! Chainsheet CLI - supply-chain template extraction
//!
//! Parses vendor supply-map spreadsheets into JSON: header fields, material
//! components, the document-group node chain and `(Role)` detail blocks.

mod config;

use anyhow::{Context, Result};
use chainsheet_backend::parse_file;
use chainsheet_core::{ParsedSheet, UploadRecord, UploadSummary};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::Config;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "chainsheet",
    about = "Extract supply-chain documentation from spreadsheet templates",
    long_about = "Extract supply-chain documentation from vendor spreadsheet templates.\n\
                  \n\
                  Reads the first sheet of an XLSX/XLSM/XLS/XLSB/ODS workbook or a CSV/TSV\n\
                  export and emits the header, component breakdown, document-group nodes\n\
                  and detail blocks as JSON.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Configuration file (overrides ~/.chainsheet.toml and ./.chainsheet.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse one spreadsheet and print the extracted JSON
    Parse {
        /// Input spreadsheet
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write JSON to this file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Pretty-print JSON (default: from config)
        #[arg(long)]
        pretty: bool,

        /// Emit an upload record (serialized results plus status) instead
        #[arg(long)]
        record: bool,
    },

    /// Parse many spreadsheets, one upload record each
    #[command(long_about = "Parse many spreadsheets independently.\n\
                      \n\
                      A file that cannot be read becomes a failed record; the others are\n\
                      unaffected. With --output-dir, each record is written to\n\
                      <stored_name>.json. Exits non-zero when any file failed.")]
    Batch {
        /// Input spreadsheets
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for per-file records (default: from config)
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Keep going after a file fails
        #[arg(long)]
        continue_on_error: bool,

        /// Pretty-print JSON records (default: from config)
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(quiet: bool, verbose: bool) {
    let default_filter = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize JSON")
}

/// Name recorded for an input file
fn original_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_parse(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    record: bool,
) -> Result<()> {
    let parsed: ParsedSheet = parse_file(input, &config.template)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let json = if record {
        let record = UploadRecord::completed(&original_name(input), Utc::now(), &parsed)?;
        to_json(&record, pretty)?
    } else {
        to_json(&parsed, pretty)?
    };

    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_batch(
    config: &Config,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    continue_on_error: bool,
    pretty: bool,
    quiet: bool,
) -> Result<UploadSummary> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut records = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = original_name(input);
        let record = match parse_file(input, &config.template) {
            Ok(parsed) => UploadRecord::completed(&name, Utc::now(), &parsed)?,
            Err(e) => {
                log::warn!("{}: {e}", input.display());
                UploadRecord::failed(&name, Utc::now(), &e)
            }
        };

        if !quiet {
            match &record.error {
                None => eprintln!("{} {}", "✓".green(), input.display()),
                Some(error) => eprintln!("{} {}: {error}", "✗".red(), input.display()),
            }
        }

        if let Some(dir) = output_dir {
            let path = dir.join(format!("{}.json", record.stored_filename));
            fs::write(&path, format!("{}\n", to_json(&record, pretty)?))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        let failed = record.error.is_some();
        records.push(record);
        if failed && !continue_on_error {
            log::warn!("stopping batch after failure (use --continue-on-error to keep going)");
            break;
        }
    }

    Ok(UploadSummary::from_records(&records))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);

    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Commands::Parse {
            input,
            output,
            pretty,
            record,
        } => run_parse(
            &config,
            &input,
            output.as_deref(),
            pretty || config.output.pretty,
            record,
        ),
        Commands::Batch {
            inputs,
            output_dir,
            continue_on_error,
            pretty,
        } => {
            let output_dir = output_dir.or_else(|| config.output.output_dir.clone());
            let summary = run_batch(
                &config,
                &inputs,
                output_dir.as_deref(),
                continue_on_error,
                pretty || config.output.pretty,
                args.quiet,
            )?;
            println!(
                "{} {} total, {} completed, {} failed",
                "Summary:".bold(),
                summary.total,
                summary.completed,
                summary.failed
            );
            if summary.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
