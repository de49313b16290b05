pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod snake;
pub mod term;
pub mod world;

/// Integer type used for grid coordinates and dimensions.
pub type GridInt = i16;

/// A grid position `(x, y)`, measured in cells.
pub type Cell = (GridInt, GridInt);
