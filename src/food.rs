use rand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::grid::{self, GRID_SIZE};
use crate::snake::Snake;
use crate::Coords;

/// Random draws before falling back to picking among the free cells.
const MAX_SAMPLES: usize = 64;

/// Source of uniform integers, injected so tests can script the sequence.
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`. `upper` is never zero.
    fn next_in_range(&mut self, upper: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn next_in_range(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("the snake covers all {0} cells, there is nowhere to put food")]
    GridFull(usize),
}

/// Picks a uniformly random cell that the snake does not occupy.
pub fn spawn_food<R: RandomSource + ?Sized>(snake: &Snake, rng: &mut R) -> Result<Coords, SpawnError> {
    let total = grid::cell_count();
    if snake.len() >= total {
        return Err(SpawnError::GridFull(total));
    }

    for _ in 0..MAX_SAMPLES {
        let x = rng.next_in_range(GRID_SIZE as usize) as i16;
        let y = rng.next_in_range(GRID_SIZE as usize) as i16;

        if !snake.contains(&(x, y)) {
            return Ok((x, y));
        }
    }

    // Crowded grid, choose directly among what is left
    let free: Vec<Coords> = grid::cells().filter(|pos| !snake.contains(pos)).collect();
    warn!(free = free.len(), "food sampling exhausted, picking among free cells");

    match free.len() {
        0 => Err(SpawnError::GridFull(total)),
        n => Ok(free[rng.next_in_range(n)]),
    }
}
