use crate::{Coords, TermInt};
use crate::game::{Frame, Frontend};
use crate::grid::{self, GRID_SIZE};
use crate::input::{command_for, Command};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, read, poll};
use thiserror::Error;
use tracing::debug;

/// Terminal columns per grid cell, so cells come out roughly square.
const CELL_WIDTH: TermInt = 2;
const CELL_STR: &str = "██";

const SNAKE_COLOR: Color = Color::Green;
const HEAD_COLOR: Color = Color::DarkGreen;
const FOOD_COLOR: Color = Color::Red;

/// Border on both sides plus the playfield.
pub const FIELD_WIDTH: TermInt = GRID_SIZE as TermInt * CELL_WIDTH + 2;
pub const FIELD_HEIGHT: TermInt = GRID_SIZE as TermInt + 2;
/// One extra row below the border for the status line.
pub const MIN_TERM_SIZE: (TermInt, TermInt) = (FIELD_WIDTH, FIELD_HEIGHT + 1);

#[derive(Debug, Error)]
pub enum TermError {
    #[error("terminal is {width}x{height}, the playfield needs at least {need_width}x{need_height}")]
    TooSmall { width: TermInt, height: TermInt, need_width: TermInt, need_height: TermInt },
    #[error(transparent)]
    Terminal(#[from] crossterm::ErrorKind),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Cell {
    Empty,
    Body,
    Head,
    Food,
}

/// Crossterm frontend: draws on the alternate screen and reads keys in raw mode.
pub struct TermManager {
    stdout: Stdout,
    screen: Vec<Cell>,
    status: String,
    closing: bool,
    alt_screen: bool,
    raw_mode: bool,
}

impl TermManager {
    pub fn new() -> Result<Self, TermError> {
        let (width, height) = terminal::size()?;
        if width < MIN_TERM_SIZE.0 || height < MIN_TERM_SIZE.1 {
            let (need_width, need_height) = MIN_TERM_SIZE;
            return Err(TermError::TooSmall { width, height, need_width, need_height });
        }

        let screen = vec![Cell::Empty; grid::cell_count()];
        Ok(TermManager { stdout: stdout(), screen, status: String::new(), closing: false, alt_screen: false, raw_mode: false })
    }

    pub fn setup(&mut self) -> Result<(), TermError> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.alt_screen = true;
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        self.draw_borders()?;
        self.stdout.flush().map_err(crossterm::ErrorKind::from)?;
        Ok(())
    }

    /// Undoes whatever `setup` managed to do. Every step is attempted; the
    /// first failure is returned.
    pub fn restore(&mut self) -> Result<(), TermError> {
        let mut result = Ok(());

        if self.raw_mode {
            self.raw_mode = false;
            keep_first(&mut result, terminal::disable_raw_mode());
        }

        if self.alt_screen {
            self.alt_screen = false;
            keep_first(&mut result, execute!(self.stdout, cursor::Show, cursor::EnableBlinking));
            keep_first(&mut result, execute!(self.stdout, LeaveAlternateScreen));
        }

        result
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> Result<(), TermError> {
        let end_x = FIELD_WIDTH - 1;
        let end_y = FIELD_HEIGHT - 1;

        for x in 0..FIELD_WIDTH {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            queue!(self.stdout, cursor::MoveTo(x, 0), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(x, end_y), style::Print(ch))?;
        }

        for y in 1..end_y {
            queue!(self.stdout, cursor::MoveTo(0, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(end_x, y), style::Print('|'))?;
        }

        Ok(())
    }

    fn print_cell(&mut self, pos: Coords, cell: Cell) -> Result<(), TermError> {
        let (col, row) = screen_pos(pos);
        queue!(self.stdout, cursor::MoveTo(col, row))?;

        match cell_color(cell) {
            Some(color) => queue!(
                self.stdout,
                style::SetForegroundColor(color),
                style::Print(CELL_STR),
                style::ResetColor
            )?,
            None => queue!(self.stdout, style::Print("  "))?,
        }

        Ok(())
    }

    fn print_status(&mut self, status: String) -> Result<(), TermError> {
        if status == self.status {
            return Ok(());
        }

        queue!(
            self.stdout,
            cursor::MoveTo(0, FIELD_HEIGHT),
            terminal::Clear(ClearType::CurrentLine),
            style::Print(&status)
        )?;
        self.status = status;
        Ok(())
    }
}

impl Frontend for TermManager {
    fn should_close(&self) -> bool {
        self.closing
    }

    fn present_frame(&mut self, frame: &Frame) -> anyhow::Result<()> {
        let next = layout(frame);

        // Only repaint what changed since the last frame
        for (i, pos) in grid::cells().enumerate() {
            if next[i] != self.screen[i] {
                self.print_cell(pos, next[i])?;
            }
        }
        self.screen = next;

        self.print_status(status_line(frame))?;
        self.stdout.flush()?;
        Ok(())
    }

    fn poll_input(&mut self) -> anyhow::Result<Vec<Command>> {
        let mut commands = vec![];

        while poll(Duration::from_millis(0)).map_err(TermError::from)? {
            if let Event::Key(ev) = read().map_err(TermError::from)? {
                match command_for(&ev) {
                    Some(Command::Quit) => {
                        debug!("quit requested");
                        self.closing = true;
                        commands.push(Command::Quit);
                    }
                    Some(cmd) => commands.push(cmd),
                    None => {}
                }
            }
        }

        Ok(commands)
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Nothing left to report to once the screen is gone
        let _ = self.restore();
    }
}

fn keep_first<E: Into<TermError>>(result: &mut Result<(), TermError>, step: Result<(), E>) {
    if let Err(err) = step {
        if result.is_ok() {
            *result = Err(err.into());
        }
    }
}

/// Top-left terminal column and row of a grid cell.
fn screen_pos(pos: Coords) -> (TermInt, TermInt) {
    (1 + pos.0 as TermInt * CELL_WIDTH, 1 + pos.1 as TermInt)
}

fn cell_color(cell: Cell) -> Option<Color> {
    match cell {
        Cell::Empty => None,
        Cell::Body => Some(SNAKE_COLOR),
        Cell::Head => Some(HEAD_COLOR),
        Cell::Food => Some(FOOD_COLOR),
    }
}

fn layout(frame: &Frame) -> Vec<Cell> {
    let mut cells = vec![Cell::Empty; grid::cell_count()];
    let index = |pos: Coords| pos.1 as usize * GRID_SIZE as usize + pos.0 as usize;

    if grid::in_bounds(frame.food) {
        cells[index(frame.food)] = Cell::Food;
    }

    for (i, pos) in frame.snake.iter().enumerate() {
        if grid::in_bounds(*pos) {
            cells[index(*pos)] = if i == 0 {Cell::Head} else {Cell::Body};
        }
    }

    cells
}

fn status_line(frame: &Frame) -> String {
    let hint = if frame.paused {"Paused"} else {"Esc pause"};
    let stats = &frame.stats;
    format!("Score {} Best {} Restarts {}  {}", stats.score, stats.best_length, stats.resets, hint)
}
