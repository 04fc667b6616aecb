use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::Result;
use tracing::{debug, info};

use crate::food::RandomSource;
use crate::input::Command;
use crate::session::{Session, SessionStats, StepOutcome::*};
use crate::Coords;

const FRAME_INTERVAL_MS: u64 = 5;
/// Steps run in one frame at most; time beyond that is dropped.
const MAX_CATCH_UP: u32 = 5;

/// The window/terminal side of the game.
pub trait Frontend {
    fn should_close(&self) -> bool;
    fn present_frame(&mut self, frame: &Frame) -> Result<()>;
    fn poll_input(&mut self) -> Result<Vec<Command>>;
}

/// What a frontend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Head first.
    pub snake: Vec<Coords>,
    pub food: Coords,
    pub stats: SessionStats,
    pub paused: bool,
}

impl Frame {
    pub fn capture<R: RandomSource>(session: &Session<R>, paused: bool) -> Self {
        Frame {
            snake: session.body().copied().collect(),
            food: session.food(),
            stats: session.stats(),
            paused,
        }
    }
}

/// Turns elapsed frame time into a whole number of simulation steps.
pub struct Ticker {
    interval: Duration,
    acc: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker { interval, acc: Duration::ZERO }
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.acc += elapsed;

        let mut due = 0;
        while self.acc >= self.interval && due < MAX_CATCH_UP {
            self.acc -= self.interval;
            due += 1;
        }

        if due == MAX_CATCH_UP && self.acc >= self.interval {
            debug!(behind = ?self.acc, "dropping simulation backlog");
            self.acc = Duration::ZERO;
        }

        due
    }

    pub fn clear(&mut self) {
        self.acc = Duration::ZERO;
    }
}

pub struct SnakeGame<F, R> {
    frontend: F,
    session: Session<R>,
    ticker: Ticker,
    paused: bool,
}

impl<F: Frontend, R: RandomSource> SnakeGame<F, R> {
    pub fn new(frontend: F, session: Session<R>, tick_interval: Duration) -> Self {
        SnakeGame { frontend, session, ticker: Ticker::new(tick_interval), paused: false }
    }

    /// Runs until the frontend asks to close.
    pub fn run(&mut self) -> Result<()> {
        info!("game started");
        let mut last = Instant::now();

        while !self.frontend.should_close() {
            for cmd in self.frontend.poll_input()? {
                if !self.handle(cmd) {
                    return self.finish();
                }
            }

            let now = Instant::now();
            self.update(now - last);
            last = now;

            let frame = Frame::capture(&self.session, self.paused);
            self.frontend.present_frame(&frame)?;

            sleep(Duration::from_millis(FRAME_INTERVAL_MS));
        }

        self.finish()
    }

    /// Applies one input command. Returns false once the game should stop.
    pub fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Turn(dir) => {
                if !self.paused {
                    self.session.set_direction(dir);
                }
            }
            Command::TogglePause => {
                self.paused = !self.paused;
                self.ticker.clear();
                debug!(paused = self.paused, "pause toggled");
            }
            Command::Quit => return false,
        }

        true
    }

    /// Advances the simulation by the steps that fit in `elapsed`.
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        if self.paused {
            return 0;
        }

        let due = self.ticker.advance(elapsed);
        for _ in 0..due {
            match self.session.step() {
                Crashed(kind) => info!(?kind, "snake crashed, starting over"),
                Won { length } => info!(length, "snake filled the grid, starting over"),
                Moved { .. } | Ate { .. } => {}
            }
        }

        due
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn finish(&mut self) -> Result<()> {
        let stats = self.session.stats();
        info!(best_length = stats.best_length, resets = stats.resets, "game stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::VecDeque;

    const TICK: Duration = Duration::from_millis(100);

    /// Feeds one batch of commands per frame and closes after `frames_left`.
    struct FakeFrontend {
        inputs: VecDeque<Vec<Command>>,
        frames: Vec<Frame>,
        frames_left: usize,
    }

    impl FakeFrontend {
        fn new(inputs: Vec<Vec<Command>>, frames_left: usize) -> Self {
            FakeFrontend { inputs: inputs.into(), frames: vec![], frames_left }
        }
    }

    impl Frontend for FakeFrontend {
        fn should_close(&self) -> bool {
            self.frames_left == 0
        }

        fn present_frame(&mut self, frame: &Frame) -> Result<()> {
            self.frames.push(frame.clone());
            self.frames_left -= 1;
            Ok(())
        }

        fn poll_input(&mut self) -> Result<Vec<Command>> {
            Ok(self.inputs.pop_front().unwrap_or_default())
        }
    }

    fn game(frontend: FakeFrontend, tick: Duration) -> SnakeGame<FakeFrontend, StdRng> {
        let session = Session::new(3, StdRng::seed_from_u64(21)).unwrap();
        SnakeGame::new(frontend, session, tick)
    }

    #[test]
    fn ticker_accumulates_partial_intervals() {
        let mut ticker = Ticker::new(TICK);
        assert_eq!(ticker.advance(Duration::from_millis(60)), 0);
        assert_eq!(ticker.advance(Duration::from_millis(60)), 1);
        assert_eq!(ticker.advance(Duration::from_millis(80)), 1);
        assert_eq!(ticker.advance(Duration::from_millis(250)), 2);
    }

    #[test]
    fn ticker_drops_a_long_stall() {
        let mut ticker = Ticker::new(TICK);
        assert_eq!(ticker.advance(Duration::from_secs(10)), MAX_CATCH_UP);
        assert_eq!(ticker.advance(Duration::from_millis(50)), 0);
    }

    #[test]
    fn update_steps_the_session() {
        let mut game = game(FakeFrontend::new(vec![], 1), TICK);
        let head = *game.session().body().next().unwrap();

        assert_eq!(game.update(TICK), 1);
        assert_ne!(*game.session().body().next().unwrap(), head);
    }

    #[test]
    fn pause_freezes_the_snake_and_turns() {
        let mut game = game(FakeFrontend::new(vec![], 1), TICK);
        let before: Vec<Coords> = game.session().body().copied().collect();

        assert!(game.handle(Command::TogglePause));
        assert!(game.is_paused());
        game.handle(Command::Turn(Up));
        assert_eq!(game.update(TICK * 3), 0);
        assert_eq!(game.session().body().copied().collect::<Vec<_>>(), before);

        game.handle(Command::TogglePause);
        game.update(TICK);
        assert_eq!(game.session().direction(), Right);
    }

    #[test]
    fn turn_is_applied_on_the_next_tick() {
        let mut game = game(FakeFrontend::new(vec![], 1), TICK);
        assert!(game.handle(Command::Turn(Down)));
        assert_eq!(game.session().direction(), Right);
        game.update(TICK);
        assert_eq!(game.session().direction(), Down);
    }

    #[test]
    fn run_presents_until_close() {
        let mut game = game(FakeFrontend::new(vec![], 3), Duration::from_secs(3600));
        game.run().unwrap();

        let frames = &game.frontend.frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].snake, vec![(10, 10), (9, 10), (8, 10)]);
        assert!(!frames[0].snake.contains(&frames[0].food));
    }

    #[test]
    fn run_stops_on_quit() {
        let inputs = vec![vec![], vec![Command::TogglePause], vec![Command::Quit]];
        let mut game = game(FakeFrontend::new(inputs, 10), Duration::from_secs(3600));
        game.run().unwrap();

        let frames = &game.frontend.frames;
        assert_eq!(frames.len(), 2);
        assert!(!frames[0].paused);
        assert!(frames[1].paused);
    }
}
