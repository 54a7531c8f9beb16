//! Grid store and its change-reporting view

pub mod cell_grid;
pub mod cells;

pub use cell_grid::{CellGrid, MOORE, ORTHOGONAL};
pub use cells::Cells;
