#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the fish tank in a terminal.

mod driver;
mod input;
mod terminal;

use std::{
    fs,
    io::{self, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use fishtank_core::{Boundary, Command, Position, SpeciesCatalog};
use fishtank_rendering::{Presentation, RenderingBackend, Scene};
use fishtank_system_stocking::{Config as StockingConfig, Stocking};
use fishtank_world::{query, Arena, ArenaConfig};
use tracing::info;

use crate::{
    driver::Driver,
    terminal::{HeadlessBackend, TerminalBackend},
};

const DEFAULT_SPECIES: &str = include_str!("../assets/species.json");

/// Command-line options for the fish tank.
#[derive(Debug, Parser)]
#[command(name = "fishtank", about = "Fish swimming around a terminal tank")]
struct Args {
    /// Interior columns of the tank.
    #[arg(long, default_value_t = 70)]
    width: i32,
    /// Interior rows of the tank.
    #[arg(long, default_value_t = 15)]
    height: i32,
    /// Frames (and simulation ticks) per second.
    #[arg(long, default_value_t = 25)]
    fps: u32,
    /// Number of random fish stocked at startup.
    #[arg(long, default_value_t = 20)]
    fish: usize,
    /// Seed for every random decision; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON species catalog replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    species: Option<PathBuf>,
    /// Stop after this many frames.
    #[arg(long)]
    ticks: Option<u64>,
    /// Skip the terminal and stdin; print the final frame instead.
    #[arg(long)]
    headless: bool,
}

impl Args {
    /// Tank outline; the border sits one cell outside the interior.
    fn boundary(&self) -> Boundary {
        Boundary::new(
            Position::new(0, 0),
            Position::new(self.width + 1, self.height + 1),
        )
    }
}

/// Entry point for the fish tank command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let catalog = load_catalog(args.species.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = ArenaConfig::new(args.boundary())
        .with_fps(args.fps)
        .with_seed(seed);
    let arena = Arena::new(config, catalog).context("failed to set up the tank")?;
    info!(seed, banner = query::welcome_banner(&arena), "starting fish tank");

    let (sender, receiver) = crossbeam_channel::unbounded();
    let mut driver = Driver::new(arena, receiver, args.ticks);
    stock(&mut driver, args.fish, seed);

    let scene = Scene::new(query::boundary(driver.arena()));
    let frame_interval = Duration::from_secs(1) / args.fps;
    let presentation = Presentation::new(
        query::welcome_banner(driver.arena()),
        frame_interval,
        scene,
    );

    if args.headless {
        // keep the channel open so only the frame limit or a shutdown ends the run
        let _sender = sender;
        HeadlessBackend::new(io::stdout().lock())
            .run(presentation, |_, scene| driver.step(scene))
    } else {
        let _reader = input::spawn_reader(BufReader::new(io::stdin()), sender)
            .context("failed to start the input thread")?;
        TerminalBackend::new(io::stdout())
            .run(presentation, |_, scene| driver.step(scene))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn load_catalog(path: Option<&Path>) -> Result<SpeciesCatalog> {
    let (source, text) = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read species file {}", path.display()))?;
            (path.display().to_string(), text)
        }
        None => ("built-in species".to_owned(), DEFAULT_SPECIES.to_owned()),
    };
    parse_catalog(&source, &text)
}

fn parse_catalog(source: &str, text: &str) -> Result<SpeciesCatalog> {
    let catalog: SpeciesCatalog =
        serde_json::from_str(text).with_context(|| format!("failed to parse {source}"))?;
    if catalog.is_empty() {
        bail!("{source} defines no species");
    }
    Ok(catalog)
}

fn stock(driver: &mut Driver, population: usize, seed: u64) {
    let mut stocking = Stocking::new(StockingConfig::new(population, seed));
    let mut commands: Vec<Command> = Vec::new();
    stocking.stock(query::catalog(driver.arena()), &mut commands);
    for command in commands {
        driver.submit(command);
    }
}
