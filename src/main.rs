//! Headless runner for the evosphere kernel.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use evosphere::simulation::error::SimError;
use evosphere::simulation::params::Params;
use evosphere::simulation::world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "evosphere")]
#[command(version)]
#[command(about = "Evolving agents with diploid genomes and neural brains")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Parameter file (JSON); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed, overriding the parameter file
        #[arg(long)]
        seed: Option<u64>,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "5000")]
        ticks: u64,

        /// Seconds per tick
        #[arg(long, default_value = "0.1")]
        dt: f32,

        /// Ticks between statistics reports
        #[arg(long, default_value = "500")]
        log_every: u64,

        /// Save the final world to this file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Continue a saved simulation
    Resume {
        /// Saved world file
        world: PathBuf,

        /// Number of additional ticks
        #[arg(short, long, default_value = "5000")]
        ticks: u64,

        /// Seconds per tick
        #[arg(long, default_value = "0.1")]
        dt: f32,

        /// Ticks between statistics reports
        #[arg(long, default_value = "500")]
        log_every: u64,

        /// Save the final world to this file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Write the default parameters to a file
    Init {
        /// Output path
        #[arg(short, long, default_value = "params.json")]
        output: PathBuf,
    },
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            seed,
            ticks,
            dt,
            log_every,
            save,
        } => {
            let mut params = match config {
                Some(path) => Params::from_file(path)?,
                None => Params::default(),
            };
            if let Some(seed) = seed {
                params.seed = seed;
            }
            let world = World::new(params)?;
            run(world, ticks, dt, log_every, save)
        }
        Commands::Resume {
            world,
            ticks,
            dt,
            log_every,
            save,
        } => {
            let world = World::load_from_file(world)?;
            info!(tick = world.tick_count(), "resumed");
            run(world, ticks, dt, log_every, save)
        }
        Commands::Init { output } => {
            Params::default().save(&output)?;
            info!(path = %output.display(), "default parameters written");
            Ok(())
        }
    }
}

fn run(
    mut world: World,
    ticks: u64,
    dt: f32,
    log_every: u64,
    save: Option<PathBuf>,
) -> Result<(), SimError> {
    let started = Instant::now();
    for step in 1..=ticks {
        world.tick(dt)?;
        if log_every > 0 && step % log_every == 0 {
            report(&world);
        }
    }
    let elapsed = started.elapsed().as_secs_f64();
    info!(
        ticks,
        seconds = elapsed,
        ticks_per_second = ticks as f64 / elapsed.max(f64::EPSILON),
        "run finished"
    );
    report(&world);

    if let Some(path) = save {
        world.save_to_file(&path)?;
        info!(path = %path.display(), "world saved");
    }
    Ok(())
}

fn report(world: &World) {
    let stats = world.statistics();
    info!(
        tick = world.tick_count(),
        population = stats.population,
        food = stats.food_count,
        species = stats.species_count,
        births = stats.births,
        deaths = stats.deaths.total(),
        starved = stats.deaths.starvation,
        killed = stats.deaths.combat,
        max_generation = stats.max_generation,
        mean_generation = stats.mean_generation,
        mutations = stats.total_mutations,
        infected = stats.infected,
        "statistics"
    );
}
