use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use grid_snake::{config, game, session, term};

fn main() -> Result<()> {
    let cli = config::Cli::parse();

    // Stdout and stderr share the raw-mode terminal the game draws on, so
    // logging goes to a file
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    // Seeded once here; a fixed seed makes food placement repeatable
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = session::Session::new(cli.initial_length(), rng)
        .context("Failed to start a game session")?;

    let mut term = term::TermManager::new().context("Failed to open the terminal")?;
    term.setup().context("Failed to set up the terminal")?;
    info!(tick = ?cli.tick_interval(), length = cli.initial_length(), seed = ?cli.seed, "starting");

    // The main game loop returns once the player quits
    game::SnakeGame::new(term, session, cli.tick_interval()).run()
}
