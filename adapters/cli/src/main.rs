#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Wa-Tor simulation.

mod config;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result as AnyResult};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wator_core::{Command, SpawnPhase};
use wator_rendering::{Frame, RenderingBackend, TextBackend};
use wator_system_analytics::{metrics, Analytics};
use wator_system_bootstrap::Bootstrap;
use wator_world::{self as world, query, World};

const DEFAULT_LOG_FILTER: &str = "wator=info";

/// Command-line arguments for the Wa-Tor simulation.
#[derive(Debug, Parser)]
#[command(name = "wator", version, about = "Wa-Tor predator and prey simulation")]
struct CliArgs {
    /// Number of ticks to simulate after the starting ocean.
    iterations: u64,
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "PATH", default_value = "config.toml")]
    config: PathBuf,
    /// Writes frames to the given file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Starts every counter at its full cycle instead of a random phase.
    #[arg(short, long)]
    discrete_time: bool,
    /// Seed for the run's random source; a fresh seed is drawn when absent.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Records the population series instead of printing frames.
    #[arg(long)]
    stats: bool,
}

impl CliArgs {
    fn phase(&self) -> SpawnPhase {
        if self.discrete_time {
            SpawnPhase::Discrete
        } else {
            SpawnPhase::Stochastic
        }
    }
}

/// Entry point for the Wa-Tor command-line interface.
fn main() -> AnyResult<()> {
    init_tracing();
    let args = CliArgs::parse();
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &CliArgs) -> AnyResult<()> {
    let settings = config::load(&args.config, args.phase())?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let world = Bootstrap
        .build_world(&settings, ChaCha8Rng::seed_from_u64(seed))
        .context("failed to build the starting ocean")?;

    let (width, height) = query::dimensions(&world);
    info!(
        seed,
        width,
        height,
        phase = ?query::spawn_phase(&world),
        iterations = args.iterations,
        "starting run"
    );

    if args.stats {
        run_stats(world, args.iterations);
        return Ok(());
    }

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create output file {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };
    run_frames(world, args.iterations, &mut TextBackend::new(sink))
}

fn run_frames(
    mut world: World,
    iterations: u64,
    backend: &mut impl RenderingBackend,
) -> AnyResult<()> {
    backend.present(&Frame::capture(0, &query::ocean_view(&world)))?;

    let mut events = Vec::new();
    for _ in 0..iterations {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        let tick = query::tick_index(&world);
        backend.present(&Frame::capture(tick, &query::ocean_view(&world)))?;
    }
    Ok(())
}

fn run_stats(mut world: World, iterations: u64) {
    let mut analytics = Analytics::new();
    analytics.record_initial(query::census(&world));

    let mut events = Vec::new();
    for _ in 0..iterations {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        analytics.handle(&events, query::census(&world));
    }

    let tally = analytics.tally();
    if let Some(summary) = metrics::summarize(analytics.series()) {
        info!(
            ticks = summary.ticks,
            prey = summary.last.prey,
            predators = summary.last.predators,
            prey_peak = summary.prey_peak.population,
            prey_peak_tick = summary.prey_peak.tick,
            predator_peak = summary.predator_peak.population,
            predator_peak_tick = summary.predator_peak.tick,
            prey_extinct_at = ?summary.prey_extinct_at,
            predators_extinct_at = ?summary.predators_extinct_at,
            prey_born = tally.prey_born,
            predators_born = tally.predators_born,
            starved = tally.starved,
            prey_eaten = tally.prey_eaten,
            moves = tally.moves,
            "population summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_well_formed() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn flags_parse_with_defaults() {
        let args = CliArgs::try_parse_from(["wator", "25"]).expect("iterations only");

        assert_eq!(args.iterations, 25);
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert_eq!(args.output, None);
        assert_eq!(args.seed, None);
        assert!(!args.stats);
        assert_eq!(args.phase(), SpawnPhase::Stochastic);
    }

    #[test]
    fn short_flags_select_discrete_time_and_seed() {
        let args = CliArgs::try_parse_from([
            "wator", "-d", "-s", "7", "-c", "ocean.toml", "-o", "frames.txt", "3",
        ])
        .expect("all short flags");

        assert_eq!(args.phase(), SpawnPhase::Discrete);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.config, PathBuf::from("ocean.toml"));
        assert_eq!(args.output, Some(PathBuf::from("frames.txt")));
    }

    #[test]
    fn missing_iterations_is_an_error() {
        assert!(CliArgs::try_parse_from(["wator", "--stats"]).is_err());
    }
}
