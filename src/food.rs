use rand::seq::IteratorRandom;
use rand::Rng;

use crate::grid::Grid;
use crate::snake::Snake;
use crate::{Cell, GridInt};

/// Which part of the board food may be placed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FoodRange {
    /// Every cell except the last column and the last row.
    Inset,
    /// The whole board.
    Full,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FoodPlacement {
    pub range: FoodRange,
    /// Only pick cells the snake does not cover.
    pub avoid_snake: bool,
}

impl Default for FoodPlacement {
    fn default() -> Self {
        FoodPlacement { range: FoodRange::Inset, avoid_snake: false }
    }
}

impl FoodRange {
    /// Exclusive upper bounds for x and y.
    fn bounds(self, grid: &Grid) -> (GridInt, GridInt) {
        match self {
            FoodRange::Inset => (grid.width() - 1, grid.height() - 1),
            FoodRange::Full => (grid.width(), grid.height()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    position: Cell,
}

impl Food {
    pub fn at(position: Cell) -> Self {
        Food { position }
    }

    pub fn spawn<R: Rng + ?Sized>(grid: &Grid, placement: FoodPlacement, snake: &Snake, rng: &mut R) -> Self {
        if placement.avoid_snake {
            let (max_x, max_y) = placement.range.bounds(grid);
            let free = grid.cells()
                .filter(|&(x, y)| x < max_x && y < max_y)
                .filter(|&cell| !snake.occupies(cell))
                .choose(&mut *rng);

            match free {
                Some(position) => return Food { position },
                None => log::warn!("no free cell left for food, placing it anywhere"),
            }
        }

        Food { position: randomize_position(grid, placement.range, rng) }
    }

    pub fn position(&self) -> Cell {
        self.position
    }
}

/// Draws a cell uniformly from `range`, ignoring whatever is on the board.
pub fn randomize_position<R: Rng + ?Sized>(grid: &Grid, range: FoodRange, rng: &mut R) -> Cell {
    let (max_x, max_y) = range.bounds(grid);
    (rng.gen_range(0..max_x), rng.gen_range(0..max_y))
}
