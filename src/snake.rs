use std::collections::VecDeque;

use crate::grid::Grid;
use crate::{Cell, GridInt};
use Direction::*;
use TickResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step in grid coordinates; y grows downwards.
    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("({0}, {1}) is not a unit step along one axis")]
pub struct InvalidDirection(pub GridInt, pub GridInt);

impl TryFrom<(GridInt, GridInt)> for Direction {
    type Error = InvalidDirection;

    fn try_from(vector: (GridInt, GridInt)) -> Result<Self, Self::Error> {
        match vector {
            (0, -1) => Ok(Up),
            (0, 1) => Ok(Down),
            (-1, 0) => Ok(Left),
            (1, 0) => Ok(Right),
            (x, y) => Err(InvalidDirection(x, y)),
        }
    }
}

/// What a single tick did to the snake.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    /// The head advanced and the tail was dropped.
    Moved { new_head: Cell, old_tail: Cell },
    /// The head reached the food, so the tail stays.
    Grew { new_head: Cell },
    /// The next head would land on the body. Nothing was changed.
    Collided { at: Cell },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    segments: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Option<Direction>,
}

impl Snake {
    pub fn new(pos: Cell) -> Self {
        Snake { segments: VecDeque::from(vec![pos]), direction: Right, pending_direction: None }
    }

    /// Builds a snake from head-first segments. Returns `None` for an empty body.
    pub fn from_segments<I>(segments: I, direction: Direction) -> Option<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        let segments: VecDeque<Cell> = segments.into_iter().collect();
        if segments.is_empty() {
            return None;
        }

        Some(Snake { segments, direction, pending_direction: None })
    }

    /// Head first.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Cell> + DoubleEndedIterator + '_ {
        self.segments.iter()
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Queues a turn for the next tick. Reversing straight into the body is
    /// ignored; a later call before the tick overrides an earlier one.
    pub fn set_pending_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.pending_direction = Some(new_direction);
        }
    }

    pub fn tick(&mut self, grid: &Grid, food: Cell) -> TickResult {
        if let Some(dir) = self.pending_direction.take() {
            self.direction = dir;
        }

        let new_head = grid.advance(self.head(), self.direction);

        if self.occupies(new_head) {
            return Collided { at: new_head };
        }

        self.segments.push_front(new_head);

        if new_head == food {
            return Grew { new_head };
        }

        let old_tail = self.segments.pop_back().expect("body holds at least the new head");
        Moved { new_head, old_tail }
    }

    pub fn reset(&mut self, center: Cell) {
        self.segments.clear();
        self.segments.push_back(center);
        self.direction = Right;
        self.pending_direction = None;
    }
}
