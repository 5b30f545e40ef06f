use serde::{Deserialize, Serialize};

use crate::core::{BlockKind, CellSet, ColorToken, PieceId};

/// Notifications emitted by a [`GameSession`](super::GameSession).
///
/// The engine never calls into a renderer. Front-ends drain these after each
/// operation and animate or redraw from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// The board was (re)initialized with `noise` pre-filled cells.
    BoardReset { noise: CellSet },
    /// A new offer was placed in the dock.
    OfferSpawned { pieces: Vec<PieceId> },
    /// A piece was committed to the board.
    CellsFilled {
        piece: PieceId,
        cells: CellSet,
        color: ColorToken,
        kind: BlockKind,
    },
    /// Cells were removed by a clear pass.
    ///
    /// A removed cell appears in exactly one set: `explosion_cells` when a bomb blast
    /// reached it, `line_cells` otherwise.
    CellsCleared {
        line_cells: CellSet,
        explosion_cells: CellSet,
        bonus_multiplier: u64,
    },
    /// The score changed. `best_score` already includes this change.
    ScoreChanged { score: u64, best_score: u64 },
    /// No offered piece fits anywhere.
    GameOver { score: u64 },
}
