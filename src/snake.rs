use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit step for this direction. Rows grow downwards.
    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Snake body, head first. Never empty.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
}

impl Snake {
    /// Lays `size` contiguous cells out behind `head`, away from `direction`.
    pub fn new(head: Coords, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();

        let body = (0..size.max(1) as i16)
            .map(|i| (head.0 - dx * i, head.1 - dy * i))
            .collect();
        Snake { body }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn tail(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: &Coords) -> bool {
        self.body.contains(pos)
    }

    /// Pushes a new head one cell towards `direction` and drops the tail
    /// unless `grow` is set. Returns the new head.
    pub fn advance(&mut self, direction: Direction, grow: bool) -> Coords {
        let old_head = self.head();
        let (dx, dy) = direction.delta();
        let new_head = (old_head.0 + dx, old_head.1 + dy);

        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }

        new_head
    }

    pub fn hits_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|pos| *pos == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites() {
        assert!(Up.is_opposite(Down));
        assert!(Down.is_opposite(Up));
        assert!(Left.is_opposite(Right));
        assert!(Right.is_opposite(Left));
        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn new_snake_extends_behind_head() {
        let snake = Snake::new((10, 10), 3, Right);
        let body: Vec<Coords> = snake.body().copied().collect();
        assert_eq!(body, vec![(10, 10), (9, 10), (8, 10)]);
        assert_eq!(snake.tail(), (8, 10));

        let snake = Snake::new((5, 5), 2, Up);
        let body: Vec<Coords> = snake.body().copied().collect();
        assert_eq!(body, vec![(5, 5), (5, 6)]);
    }

    #[test]
    fn zero_length_still_has_a_head() {
        let snake = Snake::new((3, 3), 0, Left);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), (3, 3));
    }

    #[test]
    fn advance_moves_or_grows() {
        let mut snake = Snake::new((10, 10), 3, Right);

        assert_eq!(snake.advance(Right, false), (11, 10));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.tail(), (9, 10));

        assert_eq!(snake.advance(Down, true), (11, 11));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), (9, 10));
    }

    #[test]
    fn detects_self_hit() {
        let mut snake = Snake::new((5, 5), 5, Right);
        assert!(!snake.hits_itself());

        snake.advance(Down, false);
        snake.advance(Left, false);
        assert!(!snake.hits_itself());
        snake.advance(Up, false);
        assert!(snake.hits_itself());
    }

    #[test]
    fn moving_into_the_vacated_tail_is_fine() {
        // The head takes the cell the tail leaves on the same step.
        let mut snake = Snake::new((5, 5), 4, Right);
        snake.advance(Down, false);
        snake.advance(Left, false);
        assert_eq!(snake.tail(), (4, 5));
        snake.advance(Up, false);
        assert_eq!(snake.head(), (4, 5));
        assert!(!snake.hits_itself());
    }
}
