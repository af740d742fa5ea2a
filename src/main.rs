//! emergence — simulation driver
//!
//! Usage:
//!   emergence --width 10 --height 10 --steps 150 --seed 42 --out experiment.json
//!
//! Builds a grid, steps it to completion (or ctrl-c), samples the global
//! consciousness each tick, reports emergence events as they land, and
//! writes the run log at the end.

use clap::Parser;
use emergence_sim::{EventKind, Grid, RunLog, SimConfig};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "emergence", about = "Cellular consciousness emergence simulation")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = 10)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 10)]
    height: usize,

    /// Number of ticks to run
    #[arg(long, default_value_t = 150)]
    steps: u64,

    /// Random seed; identical parameters and seed replay identically
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Record a consciousness sample every N ticks
    #[arg(long, default_value_t = 1)]
    sample_every: u64,

    /// Inject a stimulus at the grid center every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    stimulate_every: u64,

    /// Strength of the forced center stimulus
    #[arg(long, default_value_t = 0.5)]
    stimulus_strength: f64,

    /// Path to config file (TOML). Defaults apply if absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the run log
    #[arg(long, default_value = "experiment.json")]
    out: PathBuf,

    /// Dump default config as TOML and exit.
    #[arg(long)]
    dump_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.dump_config {
        println!("{}", SimConfig::default().to_toml());
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emergence=info,emergence_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path),
        None => SimConfig::default(),
    };

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted — finishing current tick");
            ctrl_c_cancel.cancel();
        }
    });

    info!(
        "Starting {}x{} grid, {} steps, seed {}",
        cli.width, cli.height, cli.steps, cli.seed
    );

    let mut grid = Grid::with_config(cli.width, cli.height, cli.seed, config);
    let mut log = RunLog::new(cli.width, cli.height, cli.steps, cli.seed);

    for tick in 1..=cli.steps {
        if cancel.is_cancelled() {
            warn!("Stopping at tick {} of {}", tick - 1, cli.steps);
            break;
        }

        if cli.stimulate_every > 0 && tick % cli.stimulate_every == 0 {
            grid.inject_stimulus_at(cli.width / 2, cli.height / 2, cli.stimulus_strength);
        }

        let events_before = grid.events().len();
        grid.step();

        for event in &grid.events()[events_before..] {
            if !event.kind.is_regular() {
                info!(
                    "tick {}: {} (consciousness {:.3})",
                    event.timestep, event.description, event.consciousness
                );
            }
        }

        if tick % cli.sample_every.max(1) == 0 {
            log.record_sample(&grid);
        }
    }
    log.finish(&grid);

    let mut spikes = 0usize;
    let mut collective = 0usize;
    let mut chaotic = 0usize;
    for event in grid.events() {
        match event.kind {
            EventKind::ConsciousnessSpike { .. } => spikes += 1,
            EventKind::CollectiveAwareness { .. } => collective += 1,
            EventKind::ChaoticOscillation => chaotic += 1,
            EventKind::Regular => {}
        }
    }
    info!(
        "Finished at tick {}: consciousness {:.3}, {} spikes, {} collective, {} chaotic",
        grid.timestep(),
        grid.global_consciousness(),
        spikes,
        collective,
        chaotic
    );

    if let Some(parent) = cli.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    log.write_json(&cli.out)?;
    info!("Run log written to {}", cli.out.display());

    Ok(())
}
