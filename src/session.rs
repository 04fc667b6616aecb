use thiserror::Error;
use tracing::{debug, error, info};

use crate::food::{spawn_food, RandomSource, SpawnError};
use crate::grid;
use crate::snake::{Direction::{self, *}, Snake};
use crate::Coords;
use StepOutcome::*;

/// Longest snake that fits left of the center cell.
pub const MAX_INITIAL_LENGTH: usize = (grid::GRID_SIZE / 2 + 1) as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    Body,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { new_head: Coords },
    Ate { new_head: Coords },
    /// The session was reset after the head hit something.
    Crashed(CollisionKind),
    /// The snake filled the grid; the session was reset.
    Won { length: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("initial snake length must be between 1 and {max}, got {got}")]
    InvalidLength { got: usize, max: usize },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Food eaten since the last reset.
    pub score: u32,
    pub best_length: usize,
    pub resets: u32,
}

/// One running game: snake, heading, food and the random source feeding it.
pub struct Session<R> {
    snake: Snake,
    direction: Direction,
    pending: Option<Direction>,
    food: Coords,
    initial_length: usize,
    stats: SessionStats,
    rng: R,
}

impl<R: RandomSource> Session<R> {
    pub fn new(initial_length: usize, rng: R) -> Result<Self, SessionError> {
        if initial_length == 0 || initial_length > MAX_INITIAL_LENGTH {
            return Err(SessionError::InvalidLength { got: initial_length, max: MAX_INITIAL_LENGTH });
        }

        let mut session = Session {
            snake: Snake::new(grid::center(), initial_length, Right),
            direction: Right,
            pending: None,
            food: grid::center(),
            initial_length,
            stats: SessionStats::default(),
            rng,
        };
        session.reset();
        Ok(session)
    }

    /// Starts over with a fresh snake at the center heading right.
    pub fn reset(&mut self) {
        self.snake = Snake::new(grid::center(), self.initial_length, Right);
        self.direction = Right;
        self.pending = None;
        self.stats.score = 0;
        self.stats.best_length = self.stats.best_length.max(self.snake.len());

        // Construction bounds the length, so a fresh snake always leaves room
        if let Err(err) = self.respawn_food() {
            error!(%err, "no room for food after reset");
        }
        debug!(food = ?self.food, "session reset");
    }

    /// Buffers a turn for the next step. Turns opposite to the heading
    /// committed at the last step are refused; among accepted turns the
    /// latest one wins.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.direction.is_opposite(requested) {
            return false;
        }

        self.pending = Some(requested);
        true
    }

    pub fn step(&mut self) -> StepOutcome {
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }

        let (dx, dy) = self.direction.delta();
        let head = self.snake.head();
        let ate = (head.0 + dx, head.1 + dy) == self.food;

        let new_head = self.snake.advance(self.direction, ate);
        let mut filled = false;

        if ate {
            self.stats.score += 1;
            self.stats.best_length = self.stats.best_length.max(self.snake.len());
            filled = matches!(self.respawn_food(), Err(SpawnError::GridFull(_)));
        }

        if let Some(kind) = self.check_collision() {
            debug!(?kind, head = ?new_head, score = self.stats.score, "collision");
            self.stats.resets += 1;
            self.reset();
            return Crashed(kind);
        }

        if filled {
            let length = self.snake.len();
            info!(length, "grid filled");
            self.stats.resets += 1;
            self.reset();
            return Won { length };
        }

        if ate { Ate { new_head } } else { Moved { new_head } }
    }

    pub fn check_collision(&self) -> Option<CollisionKind> {
        if !grid::in_bounds(self.snake.head()) {
            Some(CollisionKind::Wall)
        } else if self.snake.hits_itself() {
            Some(CollisionKind::Body)
        } else {
            None
        }
    }

    pub fn is_colliding(&self) -> bool {
        self.check_collision().is_some()
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.snake.body()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    fn respawn_food(&mut self) -> Result<(), SpawnError> {
        self.food = spawn_food(&self.snake, &mut self.rng)?;
        debug!(food = ?self.food, "food placed");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_parts(snake: Snake, direction: Direction, food: Coords, initial_length: usize, rng: R) -> Self {
        Session { snake, direction, pending: None, food, initial_length, stats: SessionStats::default(), rng }
    }
}
