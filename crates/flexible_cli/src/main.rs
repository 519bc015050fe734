//! Flexible CLI
//!
//! Headless driver for the flexible panel:
//! - `flexible simulate` replays a pointer/frame scenario against a panel
//!   built from `panel.toml` and prints a JSON report
//! - `flexible init` writes a starter config and scenario

mod config;
mod host;
mod project;
mod runner;
mod scenario;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::runner::RunConfig;
use crate::scenario::Scenario;

/// Replay touch scenarios against a three-position panel
#[derive(Parser, Debug)]
#[command(name = "flexible")]
#[command(about = "Replay touch scenarios against a three-position panel")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scenario and print the resulting report
    Simulate {
        /// Panel config file, or a directory containing panel.toml
        #[arg(short, long, default_value = ".")]
        config: PathBuf,

        /// Scenario file (JSON)
        #[arg(short, long, default_value = "scenario.json")]
        scenario: PathBuf,

        /// Frame interval in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
    },

    /// Create a starter panel.toml and scenario.json
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            scenario,
            frame_ms,
        } => cmd_simulate(config, scenario, frame_ms),
        Commands::Init { dir, force } => project::init(&dir, force),
    }
}

fn cmd_simulate(config: PathBuf, scenario: PathBuf, frame_ms: u64) -> Result<()> {
    let panel_config = config::load(&config)?;
    let scenario = Scenario::from_path(&scenario)?;

    tracing::info!(
        "Simulating {} steps (frame {}ms)",
        scenario.steps.len(),
        frame_ms
    );

    let report = runner::run(panel_config, &scenario, RunConfig { frame_ms })?;
    report.write_to_writer(&mut std::io::stdout().lock())?;
    Ok(())
}
