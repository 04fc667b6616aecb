use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::session::MAX_INITIAL_LENGTH;

pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_SNAKE_LENGTH: u64 = 3;
pub const DEFAULT_LOG_FILE: &str = "grid-snake.log";

#[derive(Debug, Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a 20x20 grid, restarts instantly on a crash")]
pub struct Cli {
    /// Milliseconds between snake moves
    #[arg(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Starting length of the snake
    #[arg(long, default_value_t = DEFAULT_SNAKE_LENGTH,
          value_parser = clap::value_parser!(u64).range(1..=MAX_INITIAL_LENGTH as u64))]
    pub length: u64,

    /// Seed for food placement, random by default
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where log output goes; the terminal itself is taken by the game
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn initial_length(&self) -> usize {
        self.length as usize
    }
}
