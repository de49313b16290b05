use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::food::{FoodPlacement, FoodRange};
use crate::grid::{Grid, MAX_GRID_SIDE, MIN_GRID_SIDE};
use crate::GridInt;

pub const DEFAULT_GRID_WIDTH: GridInt = 32;
pub const DEFAULT_GRID_HEIGHT: GridInt = 24;
pub const DEFAULT_CELL_SIZE: u16 = 2;
pub const DEFAULT_TICK_RATE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("a {width}x{height} board is too small, each side needs at least {min} cells")]
    GridTooSmall { width: GridInt, height: GridInt, min: GridInt },
    #[error("a {width}x{height} board is too large, each side may have at most {max} cells")]
    GridTooLarge { width: GridInt, height: GridInt, max: GridInt },
    #[error("tick rate must be at least one tick per second")]
    ZeroTickRate,
    #[error("cell size must be at least one column")]
    ZeroCellSize,
    #[error("the terminal is {term_width}x{term_height}, the board needs {needed_width}x{needed_height}")]
    TerminalTooSmall { term_width: u16, term_height: u16, needed_width: u16, needed_height: u16 },
}

/// What happens when the snake runs into itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CollisionPolicy {
    /// Put the snake back at the center and keep going.
    Restart,
    /// Stop and wait for a key before starting over.
    GameOver,
}

/// Settings fixed for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub grid: Grid,
    /// Terminal columns drawn per cell. Terminal characters are roughly twice
    /// as tall as they are wide.
    pub cell_size: u16,
    pub tick_rate: u32,
    pub on_collision: CollisionPolicy,
    pub food: FoodPlacement,
    pub seed: Option<u64>,
}

impl Config {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate
    }

    /// Terminal columns and rows needed to draw the board and its border.
    /// Saturates at `u16::MAX`, which no terminal can fit.
    pub fn board_size(&self) -> (u16, u16) {
        let width = (self.grid.width() as u16).saturating_mul(self.cell_size).saturating_add(2);
        let height = (self.grid.height() as u16).saturating_add(2);
        (width, height)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid: Grid::default(),
            cell_size: DEFAULT_CELL_SIZE,
            tick_rate: DEFAULT_TICK_RATE,
            on_collision: CollisionPolicy::Restart,
            food: FoodPlacement::default(),
            seed: None,
        }
    }
}

/// Snake on a board whose edges wrap around.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Board width in cells.
    #[arg(long, value_name = "CELLS", default_value_t = DEFAULT_GRID_WIDTH,
          value_parser = clap::value_parser!(i16).range(MIN_GRID_SIDE as i64..=MAX_GRID_SIDE as i64))]
    pub width: GridInt,
    /// Board height in cells.
    #[arg(long, value_name = "CELLS", default_value_t = DEFAULT_GRID_HEIGHT,
          value_parser = clap::value_parser!(i16).range(MIN_GRID_SIDE as i64..=MAX_GRID_SIDE as i64))]
    pub height: GridInt,
    /// Terminal columns used to draw one cell.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_CELL_SIZE,
          value_parser = clap::value_parser!(u16).range(1..=4))]
    pub cell_size: u16,
    /// Snake steps per second.
    #[arg(long, value_name = "HZ", default_value_t = DEFAULT_TICK_RATE,
          value_parser = clap::value_parser!(u32).range(1..=120))]
    pub tick_rate: u32,
    /// What to do when the snake bites itself.
    #[arg(long, value_enum, default_value_t = CollisionPolicy::Restart)]
    pub on_collision: CollisionPolicy,
    /// Where new food may appear.
    #[arg(long, value_enum, default_value_t = FoodRange::Inset)]
    pub food_range: FoodRange,
    /// Never place food under the snake.
    #[arg(long)]
    pub food_avoids_snake: bool,
    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write a log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Log every tick outcome, not just lifecycle events.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        Ok(Config {
            grid: Grid::new(self.width, self.height)?,
            cell_size: self.cell_size,
            tick_rate: self.tick_rate,
            on_collision: self.on_collision,
            food: FoodPlacement { range: self.food_range, avoid_snake: self.food_avoids_snake },
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("torus-snake").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_the_classic_board() {
        let config = parse(&[]).unwrap().into_config().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.grid.width(), 32);
        assert_eq!(config.grid.height(), 24);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.board_size(), (66, 26));
    }

    #[test]
    fn flags_reach_the_config() {
        let config = parse(&[
            "--width", "10", "--height", "8", "--cell-size", "1", "--tick-rate", "4",
            "--on-collision", "game-over", "--food-range", "full", "--food-avoids-snake",
            "--seed", "99",
        ])
        .unwrap()
        .into_config()
        .unwrap();

        assert_eq!(config.grid, Grid::new(10, 8).unwrap());
        assert_eq!(config.cell_size, 1);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.on_collision, CollisionPolicy::GameOver);
        assert_eq!(config.food, FoodPlacement { range: FoodRange::Full, avoid_snake: true });
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse(&["--width", "1"]).is_err());
        assert!(parse(&["--tick-rate", "0"]).is_err());
        assert!(parse(&["--cell-size", "9"]).is_err());
        assert!(parse(&["--on-collision", "explode"]).is_err());
    }

    #[test]
    fn board_size_saturates_for_library_configs() {
        let config = Config { grid: Grid::new(512, 512).unwrap(), cell_size: 200, ..Config::default() };
        assert_eq!(config.board_size(), (u16::MAX, 514));

        let config = Config { cell_size: u16::MAX, ..Config::default() };
        assert_eq!(config.board_size().0, u16::MAX);
    }

    #[test]
    fn into_config_validates_hand_built_args() {
        let mut args = parse(&[]).unwrap();
        args.height = 1;
        assert_eq!(
            args.into_config(),
            Err(ConfigError::GridTooSmall { width: 32, height: 1, min: 2 })
        );

        let mut args = parse(&[]).unwrap();
        args.tick_rate = 0;
        assert_eq!(args.into_config(), Err(ConfigError::ZeroTickRate));
    }
}
