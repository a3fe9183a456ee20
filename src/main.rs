//! Headless pursuit simulator: drives scripted scenarios through the
//! coordinator, logs the event stream to stderr and
//! prints a JSON report on stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use catcher::{init_logging, Simulation, SimulationConfig};
use clap::Parser;
use log::info;

/// Headless pursuit simulator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON simulation config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of ticks to run
    #[arg(short, long, default_value_t = 3_600)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    path.map_or_else(
        || Ok(SimulationConfig::default()),
        |file| {
            SimulationConfig::load_from_path(file)
                .with_context(|| format!("loading simulation config from {}", file.display()))
        },
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be a positive number of seconds, got {}",
        args.dt
    );

    let config = load_config(args.config.as_ref())?;
    info!(
        "simulating {} pursuers for up to {} ticks of {:.4}s",
        config.pursuers.len(),
        args.ticks,
        args.dt
    );

    let mut simulation = Simulation::new(&config);
    let report = simulation.run(args.ticks, args.dt);
    let summary = serde_json::to_string(report).context("serialising simulation report")?;
    writeln!(io::stdout().lock(), "{summary}").context("writing simulation report")?;
    Ok(())
}
