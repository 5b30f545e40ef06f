use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{BOARD_SIZE, BlockKind, Board, CellSet};

/// Chebyshev radius of a bomb's explosion (a 5×5 square).
pub const BOMB_RADIUS: usize = 2;

/// Everything a single clear pass found and removed.
///
/// Built by [`scan_clears`] from a board snapshot taken after a placement. All sets
/// are computed before any cell is removed, so the result does not depend on the
/// order in which lines or bombs are examined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearReport {
    full_rows: ArrayVec<usize, BOARD_SIZE>,
    full_cols: ArrayVec<usize, BOARD_SIZE>,
    line_cells: CellSet,
    explosion_cells: CellSet,
    clear_set: CellSet,
    bombs_detonated: usize,
    stars: usize,
}

impl ClearReport {
    /// Indices of the rows that were full.
    #[must_use]
    pub fn full_rows(&self) -> &[usize] {
        &self.full_rows
    }

    /// Indices of the columns that were full.
    #[must_use]
    pub fn full_cols(&self) -> &[usize] {
        &self.full_cols
    }

    /// Number of full rows plus full columns.
    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.full_rows.len() + self.full_cols.len()
    }

    /// Union of all full rows and columns. A cell in both is counted once.
    #[must_use]
    pub const fn line_cells(&self) -> CellSet {
        self.line_cells
    }

    /// Cells within the explosion square of a detonated bomb. May overlap
    /// [`line_cells`](Self::line_cells).
    #[must_use]
    pub const fn explosion_cells(&self) -> CellSet {
        self.explosion_cells
    }

    /// Every cell emptied by the pass, including empty cells inside a blast square.
    ///
    /// Its size is what the clear award is computed from.
    #[must_use]
    pub const fn clear_set(&self) -> CellSet {
        self.clear_set
    }

    #[must_use]
    pub const fn bombs_detonated(&self) -> usize {
        self.bombs_detonated
    }

    /// Number of star blocks in the clear set.
    #[must_use]
    pub const fn stars(&self) -> usize {
        self.stars
    }

    /// Score multiplier: one plus one per star cleared.
    #[must_use]
    pub fn bonus_multiplier(&self) -> u64 {
        1 + self.stars as u64
    }

    /// Returns true when nothing was cleared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clear_set.is_empty()
    }
}

/// Computes what a clear pass would remove from `board`, without mutating it.
///
/// 1. Every full row and full column contributes its cells to the line set.
/// 2. Each bomb inside the line set detonates, adding every cell of the 5×5 square
///    around it (clipped to the board, filled or not) to the clear set. Bombs caught only
///    by an explosion do not detonate in turn.
/// 3. Stars are counted over the final clear set.
#[must_use]
pub fn scan_clears(board: &Board) -> ClearReport {
    let full_rows = (0..BOARD_SIZE)
        .filter(|&row| board.is_row_full(row))
        .collect::<ArrayVec<_, BOARD_SIZE>>();
    let full_cols = (0..BOARD_SIZE)
        .filter(|&col| board.is_col_full(col))
        .collect::<ArrayVec<_, BOARD_SIZE>>();

    let line_cells = full_rows
        .iter()
        .map(|&row| CellSet::row(row))
        .chain(full_cols.iter().map(|&col| CellSet::col(col)))
        .fold(CellSet::EMPTY, |acc, set| acc | set);

    let mut bombs_detonated = 0;
    let mut explosion_cells = CellSet::EMPTY;
    for pos in line_cells.iter() {
        if board.cell(pos).kind() == Some(BlockKind::Bomb) {
            bombs_detonated += 1;
            explosion_cells |= CellSet::square_around(pos, BOMB_RADIUS);
        }
    }

    let clear_set = line_cells | explosion_cells;
    let stars = clear_set
        .iter()
        .filter(|&pos| board.cell(pos).kind() == Some(BlockKind::Star))
        .count();

    ClearReport {
        full_rows,
        full_cols,
        line_cells,
        explosion_cells,
        clear_set,
        bombs_detonated,
        stars,
    }
}

/// Detects and removes full lines and bomb explosions in one pass.
///
/// Runs after every placement. A second call on the same board finds nothing, since
/// no line stays full after its cells are emptied.
pub fn resolve_clears(board: &mut Board) -> ClearReport {
    let report = scan_clears(board);
    if !report.is_empty() {
        board.clear(report.clear_set);
    }
    report
}
