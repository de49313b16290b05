use crate::config::{ConfigError, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
use crate::snake::Direction;
use crate::{Cell, GridInt};

/// Smallest board edge, in cells. Food placement leaves out the last row and
/// column, so anything smaller would have nowhere to put food.
pub const MIN_GRID_SIDE: GridInt = 2;

/// Largest board edge, in cells.
pub const MAX_GRID_SIDE: GridInt = 512;

/// A fixed `width` x `height` board whose edges wrap around.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: GridInt,
    height: GridInt,
}

impl Default for Grid {
    fn default() -> Self {
        Grid { width: DEFAULT_GRID_WIDTH, height: DEFAULT_GRID_HEIGHT }
    }
}

impl Grid {
    pub fn new(width: GridInt, height: GridInt) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall { width, height, min: MIN_GRID_SIDE });
        }
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge { width, height, max: MAX_GRID_SIDE });
        }

        Ok(Grid { width, height })
    }

    pub fn width(&self) -> GridInt {
        self.width
    }

    pub fn height(&self) -> GridInt {
        self.height
    }

    pub fn center(&self) -> Cell {
        (self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.0) && (0..self.height).contains(&cell.1)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// The cell one step from `cell` towards `direction`. Leaving the board
    /// through any edge re-enters from the opposite one.
    pub fn advance(&self, cell: Cell, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        let (mut x, mut y) = (cell.0 + dx, cell.1 + dy);

        if x > self.width - 1 {
            x = 0;
        } else if x < 0 {
            x = self.width - 1;
        }

        if y > self.height - 1 {
            y = 0;
        } else if y < 0 {
            y = self.height - 1;
        }

        (x, y)
    }
}
