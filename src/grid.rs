use crate::Coords;

/// Side of the square playfield, in cells.
pub const GRID_SIZE: i16 = 20;

pub fn in_bounds(pos: Coords) -> bool {
    (0..GRID_SIZE).contains(&pos.0) && (0..GRID_SIZE).contains(&pos.1)
}

pub fn center() -> Coords {
    (GRID_SIZE / 2, GRID_SIZE / 2)
}

pub fn cell_count() -> usize {
    GRID_SIZE as usize * GRID_SIZE as usize
}

/// Every cell of the grid, row by row.
pub fn cells() -> impl Iterator<Item = Coords> {
    (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| (x, y)))
}
