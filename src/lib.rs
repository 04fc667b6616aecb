//! Snake on a fixed 20x20 grid.
//!
//! The game core (`grid`, `snake`, `food`, `session`) has no I/O and can be
//! driven step by step. `game` runs it against a `Frontend`, and `term`
//! provides the crossterm one.

pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod session;
pub mod snake;
pub mod term;

pub type TermInt = u16;
/// Grid cell. Signed, so a head that just left the grid is still representable.
pub type Coords = (i16, i16);
