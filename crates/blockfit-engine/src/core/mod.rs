pub use self::{board::*, cell_set::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod cell_set;
pub(crate) mod piece;
pub(crate) mod shape;

/// Number of rows and columns of the (square) board.
pub const BOARD_SIZE: usize = 10;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
