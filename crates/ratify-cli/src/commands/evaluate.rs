//! Evaluate command - aggregate approvals for a change and render the report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use ratify_approval::{
    Evaluation, EvaluationOptions, ReportMetadata, needs_update, render,
};
use ratify_config::Config;
use tracing::info;

use crate::change::ChangeFile;
use crate::config_bridge;
use crate::owners_table::OwnersTable;

/// How to print the evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    /// The Markdown status report.
    #[default]
    Markdown,
    /// Machine-readable status summary.
    Json,
}

/// Inputs for one evaluation.
#[derive(Debug, Clone)]
pub(crate) struct EvaluateArgs {
    pub(crate) owners: PathBuf,
    pub(crate) change: PathBuf,
    pub(crate) previous: Option<PathBuf>,
    pub(crate) seed: Option<u64>,
    pub(crate) format: ReportFormat,
    pub(crate) skip_unchanged: bool,
}

/// Result of the evaluate command.
#[derive(Debug)]
pub(crate) struct Outcome {
    /// Text for stdout, `None` when there is nothing to print.
    pub(crate) output: Option<String>,
    /// Whether the change may merge.
    pub(crate) authorized: bool,
}

/// Run an evaluation.
pub(crate) fn run_evaluate(args: &EvaluateArgs, config: &Config) -> Result<Outcome> {
    let owners = OwnersTable::load(&args.owners)?;
    let change = ChangeFile::load(&args.change)?;
    let ledger = change.ledger()?;

    let previous_body = args
        .previous
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read previous report {}", path.display()))
        })
        .transpose()?;
    let previous_meta = previous_body
        .as_deref()
        .map(ReportMetadata::extract)
        .transpose()
        .context("previous report carries unreadable metadata")?
        .flatten();

    let seed = args.seed.unwrap_or(config.suggestion.seed);
    let options = EvaluationOptions::with_seed(seed).with_previous(previous_meta);
    let evaluation = Evaluation::run(&owners, &change.files, &ledger, &options)?;
    let authorized = evaluation.is_authorized();

    let output = match args.format {
        ReportFormat::Json => Some(serde_json::to_string_pretty(&evaluation.summary())?),
        ReportFormat::Markdown => {
            let display = config_bridge::to_display_context(config)?;
            let report = render(&evaluation, &display)?;
            match report {
                Some(body)
                    if args.skip_unchanged && !needs_update(previous_body.as_deref(), &body) =>
                {
                    info!("report unchanged; nothing to post");
                    None
                },
                other => other,
            }
        },
    };

    Ok(Outcome { output, authorized })
}
