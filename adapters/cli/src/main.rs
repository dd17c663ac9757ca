#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Predation simulation and streams its
//! population metrics to stdout.

mod report;
mod settings;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use predation_simulation::Simulation;
use tracing_subscriber::EnvFilter;

use crate::report::{OutputFormat, Report};

const DEFAULT_LOG_FILTER: &str = "predation=info";

/// Runs a seeded predator-prey simulation on a toroidal grid.
#[derive(Debug, Parser)]
#[command(name = "predation", version, about)]
struct CliArgs {
    /// TOML file with simulation parameters; missing keys keep their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of ticks to run.
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Seed for the random source, overriding the configuration file.
    #[arg(long)]
    seed: Option<u64>,

    /// Output format for the per-tick metrics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// Entry point for the Predation command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing();

    let mut config = settings::load(args.config.as_deref())?;
    settings::apply_overrides(&mut config, args.seed);
    let mut simulation = Simulation::new(config).context("invalid simulation configuration")?;

    let stdout = io::stdout();
    let mut report = Report::new(args.format, stdout.lock());
    report.write_header()?;
    write_latest(&simulation, &mut report)?;

    for _ in 0..args.ticks {
        if !simulation.is_running() {
            tracing::info!(tick = simulation.tick(), "stopping early");
            break;
        }
        let _ = simulation.step();
        write_latest(&simulation, &mut report)?;
    }
    report.finish()?;

    if let Some(sample) = simulation.latest() {
        tracing::info!(
            tick = sample.tick,
            herbivores = sample.herbivores,
            predators = sample.predators,
            mutated_predators = sample.mutated_predators,
            apex_predators = sample.apex_predators,
            grass = sample.grass,
            tree = sample.tree,
            "final population"
        );
    }
    Ok(())
}

fn write_latest<W: io::Write>(simulation: &Simulation, report: &mut Report<W>) -> Result<()> {
    let sample = simulation.latest().copied().unwrap_or_default();
    let vitals = simulation.vitals().last().copied().unwrap_or_default();
    report
        .write_row(&sample, &vitals)
        .with_context(|| format!("failed to write metrics for tick {}", sample.tick))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
