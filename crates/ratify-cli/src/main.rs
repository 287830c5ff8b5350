//! Ratify CLI - OWNERS approval reports from the command line.
//!
//! Reads an owners table and a change description, aggregates the recorded
//! approvals and prints the status report a host would post on the change.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ratify_config::Config;

mod change;
mod commands;
pub mod config_bridge;
mod owners_table;
mod theme;

use commands::config::{self, ShowArg};
use commands::evaluate::{self, EvaluateArgs, ReportFormat};
use commands::meta;
use theme::Theme;

/// Ratify - OWNERS-based approval reports
#[derive(Parser)]
#[command(name = "ratify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file layered over ~/.ratify/config.toml
    #[arg(long, global = true, env = "RATIFY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a change and print its approval report
    Evaluate {
        /// TOML table of directory approvers
        #[arg(long)]
        owners: PathBuf,

        /// TOML description of the change
        #[arg(long)]
        change: PathBuf,

        /// Previously posted report body
        #[arg(long)]
        previous: Option<PathBuf>,

        /// Suggestion seed, overriding suggestion.seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: ReportFormat,

        /// Print nothing when the report matches --previous
        #[arg(long)]
        skip_unchanged: bool,
    },

    /// Print the metadata embedded in a report
    Meta {
        /// Report body file
        file: PathBuf,
    },

    /// View and validate configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: ShowArg,
    },
    /// Validate the current configuration
    Validate,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref());

    // Set up logging from config, with --verbose override.
    let log_config = if let Ok(resolved) = &loaded {
        let mut lc = config_bridge::to_log_config(&resolved.config);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        // Fallback if config loading fails.
        let level = if cli.verbose { "debug" } else { "warn" };
        ratify_telemetry::LogConfig::new(level)
    };
    if let Err(e) = ratify_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Commands::Config {
        command: ConfigCommands::Validate,
    } = cli.command
    {
        let valid = config::validate_config(&loaded);
        return Ok(if valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let resolved = loaded.context("failed to load configuration")?;

    match cli.command {
        Commands::Evaluate {
            owners,
            change,
            previous,
            seed,
            format,
            skip_unchanged,
        } => {
            let args = EvaluateArgs {
                owners,
                change,
                previous,
                seed,
                format,
                skip_unchanged,
            };
            handle_evaluate(&args, &resolved.config)?;
        },
        Commands::Meta { file } => match meta::read_meta(&file)? {
            Some(json) => println!("{json}"),
            None => eprintln!("{}", Theme::info("no metadata block found")),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => config::show_config(&resolved, format)?,
            ConfigCommands::Validate => {},
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn handle_evaluate(args: &EvaluateArgs, config: &Config) -> Result<()> {
    let outcome = evaluate::run_evaluate(args, config)?;
    if let Some(output) = &outcome.output {
        println!("{output}");
    }
    eprintln!("{}", Theme::verdict(outcome.authorized));
    Ok(())
}
