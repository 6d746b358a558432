//! Command-line host for the Graft content-merge engine.
//!
//! Loads a content graph and a directory of item descriptors, merges the
//! descriptors into the graph and writes the merged graph back out.
//!
//! # Run Sequence
//!
//! 1. Parse arguments and load `graft.yaml` (defaults when absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load the content graph, descriptors and optional crafts
//! 4. Merge and log the report
//! 5. Write the merged graph to `--out` or stdout

mod error;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use graft_content::{ContentGraph, load_crafts_dir, load_dir};
use graft_merge::{MergeConfig, MergeReport, Merger, add_recipes};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Merge custom item descriptors into a content graph.
#[derive(Debug, Parser)]
#[command(name = "graft", author, version, about)]
struct Cli {
    /// Content graph JSON document.
    #[arg(long, value_name = "CONTENT.json")]
    graph: PathBuf,

    /// Directory of item descriptor documents.
    #[arg(long, value_name = "DIR")]
    descriptors: PathBuf,

    /// Directory of hideout craft documents.
    #[arg(long, value_name = "DIR")]
    crafts: Option<PathBuf>,

    /// Merge configuration.
    #[arg(long, value_name = "graft.yaml")]
    config: Option<PathBuf>,

    /// Where to write the merged graph; stdout when omitted.
    #[arg(long, value_name = "MERGED.json")]
    out: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

/// Entry point for the `graft` binary.
///
/// # Errors
///
/// Returns an error if configuration, input loading, a fail-fast merge or
/// writing the output fails.
fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => MergeConfig::from_file(path)?,
        None => MergeConfig::default(),
    };
    init_logging(&config.logging.level, cli.log_json)?;
    info!(config = ?cli.config, "graft starting");

    let mut graph = ContentGraph::from_path(&cli.graph)?;
    info!(
        path = %cli.graph.display(),
        items = graph.items.len(),
        maps = graph.locations.len(),
        bots = graph.bot_types.len(),
        "Content graph loaded"
    );

    let load = load_dir(&cli.descriptors)?;
    for warning in &load.warnings {
        warn!(%warning, "Descriptor input skipped");
    }

    if let Some(dir) = &cli.crafts {
        let crafts = load_crafts_dir(dir)?;
        for warning in &crafts.warnings {
            warn!(%warning, "Craft input skipped");
        }
        let added = add_recipes(&mut graph, &crafts.recipes);
        info!(added, "Hideout crafts merged");
    }

    let report = Merger::new(config).merge(&load.descriptors, &mut graph)?;
    log_report(&report);

    match &cli.out {
        Some(path) => {
            graph.to_path(path)?;
            info!(path = %path.display(), "Merged graph written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            graph.to_writer(&mut stdout)?;
            writeln!(stdout).map_err(|e| graft_content::ContentError::io("<stdout>", e))?;
        }
    }
    Ok(())
}

/// Install the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(level: &str, json: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}

fn log_report(report: &MergeReport) {
    for failure in &report.failures {
        error!(item = %failure.item(), "Descriptor not merged");
    }
    info!(
        merged = report.items_merged,
        warnings = report.warnings.len(),
        failures = report.failures.len(),
        "graft finished"
    );
}
