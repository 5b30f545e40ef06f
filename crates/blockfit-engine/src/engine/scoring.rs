use serde::{Deserialize, Serialize};

use crate::core::Shape;

use super::line_clear::ClearReport;

/// Points per line, applied to the square of the number of lines cleared at once.
const LINE_POINTS: u64 = 10;
/// Points per removed cell when at least one line was cleared.
const CELL_POINTS: u64 = 2;
/// Points per removed cell when only explosions cleared cells.
const EXPLOSION_CELL_POINTS: u64 = 5;

/// Points for placing a piece: one per cell.
#[must_use]
pub fn placement_award(shape: Shape) -> u64 {
    shape.len() as u64
}

/// Points for a clear pass with the given totals.
///
/// - `lines > 0`: `10 * lines² + 2 * cells`
/// - `lines == 0`: `5 * cells`
///
/// The base is then multiplied by `bonus_multiplier`.
#[must_use]
pub fn clear_award_for(lines: usize, cells: usize, bonus_multiplier: u64) -> u64 {
    let lines = lines as u64;
    let cells = cells as u64;
    let base = if lines > 0 {
        LINE_POINTS * lines * lines + CELL_POINTS * cells
    } else {
        EXPLOSION_CELL_POINTS * cells
    };
    base * bonus_multiplier
}

/// Points for a clear pass. Zero when nothing was cleared.
#[must_use]
pub fn clear_award(report: &ClearReport) -> u64 {
    if report.is_empty() {
        return 0;
    }
    clear_award_for(
        report.lines_cleared(),
        report.clear_set().len(),
        report.bonus_multiplier(),
    )
}

/// Running totals for a session.
///
/// # Example
///
/// ```
/// use blockfit_engine::{GameStats, ShapeKind};
///
/// let mut stats = GameStats::new();
/// stats.record_placement(ShapeKind::O.shape());
///
/// assert_eq!(stats.score(), 4);
/// assert_eq!(stats.placed_pieces(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    placed_pieces: usize,
    placed_cells: usize,
    cleared_lines: usize,
    cleared_cells: usize,
    bombs_detonated: usize,
    stars_collected: usize,
    best_clear_award: u64,
    /// `[i]` counts clear passes that removed `i` lines at once; the last slot also
    /// holds larger clears.
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            placed_pieces: 0,
            placed_cells: 0,
            cleared_lines: 0,
            cleared_cells: 0,
            bombs_detonated: 0,
            stars_collected: 0,
            best_clear_award: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn placed_pieces(&self) -> usize {
        self.placed_pieces
    }

    #[must_use]
    pub const fn placed_cells(&self) -> usize {
        self.placed_cells
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub const fn cleared_cells(&self) -> usize {
        self.cleared_cells
    }

    #[must_use]
    pub const fn bombs_detonated(&self) -> usize {
        self.bombs_detonated
    }

    #[must_use]
    pub const fn stars_collected(&self) -> usize {
        self.stars_collected
    }

    /// Largest single clear award so far.
    #[must_use]
    pub const fn best_clear_award(&self) -> u64 {
        self.best_clear_award
    }

    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Adds the placement award for `shape` and returns it.
    pub fn record_placement(&mut self, shape: Shape) -> u64 {
        let award = placement_award(shape);
        self.placed_pieces += 1;
        self.placed_cells += shape.len();
        self.score += award;
        award
    }

    /// Adds the award for a clear pass and returns it. Empty reports are ignored.
    pub fn record_clear(&mut self, report: &ClearReport) -> u64 {
        if report.is_empty() {
            return 0;
        }
        let award = clear_award(report);
        let lines = report.lines_cleared();
        self.cleared_lines += lines;
        self.cleared_cells += report.clear_set().len();
        self.bombs_detonated += report.bombs_detonated();
        self.stars_collected += report.stars();
        self.line_cleared_counter[lines.min(self.line_cleared_counter.len() - 1)] += 1;
        self.best_clear_award = self.best_clear_award.max(award);
        self.score += award;
        award
    }
}
