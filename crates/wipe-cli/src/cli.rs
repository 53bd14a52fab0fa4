//! Command-line interface.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use wipe_core::{ConfigError, WipeConfig, WipeError};
use wipe_engine::{ActionOutcome, ActionRegistry, MemoryDocument, Orchestrator, SnapshotError};

use crate::render::{outcomes_to_json, render_action_list, render_outcome};

#[derive(Parser, Debug)]
#[command(name = "wipe")]
#[command(version)]
#[command(about = "Run bulk cleanup actions against a document snapshot", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/wipe/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Document snapshot (JSON)
    pub snapshot: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered actions
    #[clap(visible_alias = "ls")]
    List,
    /// Run actions by name, in the given order
    Run {
        /// Action name(s)
        #[arg(required = true)]
        names: Vec<String>,
        /// Write the resulting snapshot here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run every action, independent ones first
    RunAll {
        /// Write the resulting snapshot here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot read snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Wipe(#[from] WipeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn load_config(path: Option<&Path>) -> Result<WipeConfig, CliError> {
    match path {
        Some(path) => Ok(WipeConfig::load(path)?),
        None => match WipeConfig::load_default() {
            Err(ConfigError::NoConfigDir) => {
                tracing::warn!("No config directory, using defaults");
                Ok(WipeConfig::default())
            }
            other => Ok(other?),
        },
    }
}

/// Execute a parsed command line, writing results to `out`.
///
/// Returns `Ok(false)` when any requested action failed.
pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<bool, CliError> {
    let config = load_config(cli.config.as_deref())?;
    let document = MemoryDocument::load(&cli.snapshot)?;
    let registry = Arc::new(ActionRegistry::initialize(&document, config)?);

    let (outcomes, output) = match cli.command {
        Command::List => {
            let actions = registry.list();
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&actions)?)?;
            } else {
                writeln!(out, "{}", render_action_list(&actions))?;
            }
            return Ok(true);
        }
        Command::Run { names, output } => {
            let orchestrator = Orchestrator::new(registry);
            (orchestrator.run_named(&names, &document), output)
        }
        Command::RunAll { output } => {
            let orchestrator = Orchestrator::new(registry);
            (orchestrator.run_all(&document), output)
        }
    };

    print_outcomes(&outcomes, cli.json, out)?;

    if let Some(path) = output {
        document.save(&path)?;
        tracing::info!("Saved snapshot to {}", path.display());
    }

    Ok(outcomes.iter().all(ActionOutcome::is_ok))
}

fn print_outcomes(
    outcomes: &[ActionOutcome],
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if json {
        writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&outcomes_to_json(outcomes))?
        )?;
    } else {
        for outcome in outcomes {
            writeln!(out, "{}", render_outcome(outcome))?;
        }
    }
    Ok(())
}
