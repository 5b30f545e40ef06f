//! Rules engine for a 10×10 block-placement puzzle.
//!
//! Pieces of fixed shape are offered in a dock and placed onto the board without
//! rotation. Completed rows and columns clear together, bombs blow up a 5×5 area
//! when caught in a line, and stars multiply the award of the clear that removes
//! them. The game ends when no offered piece fits anywhere.
//!
//! - [`core`] - Board, cells, shapes and pieces
//! - [`engine`] - Placement, clearing, scoring, spawning and sessions

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PlaceError {
    #[display("game is over")]
    GameOver,
    #[display("piece {piece} is not offered")]
    UnknownPiece { piece: PieceId },
    #[display("piece {piece} does not fit at {anchor}")]
    InvalidPlacement { piece: PieceId, anchor: Position },
    #[display("piece {piece} is being dragged")]
    DragInProgress { piece: PieceId },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DragError {
    #[display("game is over")]
    GameOver,
    #[display("piece {piece} is not offered")]
    UnknownPiece { piece: PieceId },
    #[display("piece {piece} is already being dragged")]
    AlreadyDragging { piece: PieceId },
    #[display("no piece is being dragged")]
    NotDragging,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SpawnConfigError {
    #[display("spawn chances must be between 0 and 1")]
    ChanceOutOfRange,
    #[display("bomb and star chances add up to more than 1")]
    ChancesExceedOne,
    #[display("offer size must be between 1 and 3, got {offer_size}")]
    InvalidOfferSize { offer_size: usize },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid spawn settings: {_0}")]
    Spawn(SpawnConfigError),
}
