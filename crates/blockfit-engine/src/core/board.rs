use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use super::{
    BOARD_SIZE, CELL_COUNT,
    cell_set::{CellSet, Position},
    piece::{BlockKind, ColorToken},
    shape::Shape,
};

/// A single board cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum Cell {
    #[default]
    Empty,
    Occupied { color: ColorToken, kind: BlockKind },
}

impl Cell {
    #[must_use]
    pub const fn kind(self) -> Option<BlockKind> {
        match self {
            Cell::Empty => None,
            Cell::Occupied { kind, .. } => Some(kind),
        }
    }

    #[must_use]
    pub const fn color(self) -> Option<ColorToken> {
        match self {
            Cell::Empty => None,
            Cell::Occupied { color, .. } => Some(color),
        }
    }

    const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied {
                kind: BlockKind::Normal,
                ..
            } => '#',
            Cell::Occupied {
                kind: BlockKind::Bomb,
                ..
            } => 'B',
            Cell::Occupied {
                kind: BlockKind::Star,
                ..
            } => 'S',
        }
    }
}

/// The 10×10 play field.
///
/// Stores two views of the same state:
///
/// - **cells**: what occupies each position (color and kind), for rendering and
///   special-block resolution
/// - **occupancy**: a [`CellSet`] of filled positions, for placement and
///   full-line checks as single mask operations
///
/// Every mutation goes through [`place`](Self::place), [`clear`](Self::clear) or
/// [`seed_noise`](Self::seed_noise), which keep both views in sync.
///
/// # Example
///
/// ```
/// use blockfit_engine::{BlockKind, Board, ColorToken, Position, ShapeKind};
///
/// let mut board = Board::EMPTY;
/// board.place(
///     ShapeKind::I4H.shape(),
///     Position::new(0, 0),
///     ColorToken::Color2,
///     BlockKind::Normal,
/// );
/// assert!(!board.is_empty(0, 3));
/// assert!(board.is_empty(0, 4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    occupancy: CellSet,
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const SIZE: usize = BOARD_SIZE;

    pub const EMPTY: Self = Self {
        cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        occupancy: CellSet::EMPTY,
    };

    #[must_use]
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.row()][pos.col()]
    }

    /// Returns true iff `(row, col)` is on the board and empty.
    ///
    /// Off-board coordinates are reported as non-empty so they are never placement targets.
    #[must_use]
    pub fn is_empty(&self, row: i32, col: i32) -> bool {
        Position::checked(row, col).is_some_and(|pos| !self.occupancy.contains(pos))
    }

    /// Returns the set of occupied positions.
    #[must_use]
    pub fn occupied_cells(&self) -> CellSet {
        self.occupancy
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE]> {
        self.cells.iter()
    }

    /// Returns true iff every cell in the row is occupied.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.occupancy.is_superset(CellSet::row(row))
    }

    /// Returns true iff every cell in the column is occupied.
    #[must_use]
    pub fn is_col_full(&self, col: usize) -> bool {
        self.occupancy.is_superset(CellSet::col(col))
    }

    /// Places a shape with its bounding-box origin at `anchor`.
    ///
    /// Returns the filled positions.
    ///
    /// # Panics
    ///
    /// Panics if any covered cell is off the board or already occupied. Callers must
    /// validate the placement first (see [`is_valid_placement`](crate::is_valid_placement)).
    pub fn place(
        &mut self,
        shape: Shape,
        anchor: Position,
        color: ColorToken,
        kind: BlockKind,
    ) -> CellSet {
        let (row, col) = anchor.signed();
        let cells = shape
            .cells_at(row, col)
            .unwrap_or_else(|| panic!("placement at {anchor} leaves the board"));
        assert!(
            cells.is_disjoint(self.occupancy),
            "placement at {anchor} overlaps occupied cells"
        );
        for pos in cells.iter() {
            self.cells[pos.row()][pos.col()] = Cell::Occupied { color, kind };
        }
        self.occupancy |= cells;
        cells
    }

    /// Empties every listed cell. Already-empty cells are left as they are.
    pub fn clear(&mut self, cells: CellSet) {
        for pos in cells.iter() {
            self.cells[pos.row()][pos.col()] = Cell::Empty;
        }
        self.occupancy = self.occupancy - cells;
    }

    /// Fills up to `count` randomly chosen empty cells with neutral normal blocks.
    ///
    /// The request is clamped to the number of empty cells. Returns the filled positions.
    pub fn seed_noise<R>(&mut self, count: usize, rng: &mut R) -> CellSet
    where
        R: Rng + ?Sized,
    {
        let empties = (CellSet::ALL - self.occupancy)
            .iter()
            .collect::<ArrayVec<Position, CELL_COUNT>>();
        let seeded = empties
            .choose_multiple(rng, count)
            .copied()
            .collect::<CellSet>();
        for pos in seeded.iter() {
            self.cells[pos.row()][pos.col()] = Cell::Occupied {
                color: ColorToken::Neutral,
                kind: BlockKind::Normal,
            };
        }
        self.occupancy |= seeded;
        seeded
    }

    /// Creates a `Board` from ASCII art.
    ///
    /// `.` is empty, `#` a normal block, `B` a bomb and `S` a star. Rows are given top
    /// to bottom; missing trailing rows are empty. Whitespace inside a row is ignored.
    ///
    /// # Panics
    ///
    /// Panics on malformed art. Meant for fixtures and tests.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_SIZE,
            "board art has {} rows, at most {BOARD_SIZE} allowed",
            lines.len()
        );

        for (row, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(
                chars.len(),
                BOARD_SIZE,
                "Each row must have exactly {BOARD_SIZE} cells, got {} at row {row}",
                chars.len(),
            );
            for (col, ch) in chars.into_iter().enumerate() {
                let (color, kind) = match ch {
                    '.' => continue,
                    '#' => (ColorToken::Neutral, BlockKind::Normal),
                    'B' => (ColorToken::Bomb, BlockKind::Bomb),
                    'S' => (ColorToken::Star, BlockKind::Star),
                    _ => panic!("unexpected cell {ch:?} at ({row}, {col})"),
                };
                board.place(Shape::MONO, Position::new(row, col), color, kind);
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::ShapeKind;

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                assert!(board.is_empty(row as i32, col as i32));
                assert_eq!(board.cell(Position::new(row, col)), Cell::Empty);
            }
            assert!(!board.is_row_full(row));
            assert!(!board.is_col_full(row));
        }
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_is_not_empty() {
        let board = Board::EMPTY;
        assert!(!board.is_empty(-1, 0));
        assert!(!board.is_empty(0, -1));
        assert!(!board.is_empty(10, 0));
        assert!(!board.is_empty(0, 10));
    }

    #[test]
    fn test_place_sets_color_and_kind() {
        let mut board = Board::EMPTY;
        let filled = board.place(
            ShapeKind::T0.shape(),
            Position::new(2, 3),
            ColorToken::Color7,
            BlockKind::Normal,
        );
        assert_eq!(filled.len(), 4);
        for pos in filled.iter() {
            assert_eq!(
                board.cell(pos),
                Cell::Occupied {
                    color: ColorToken::Color7,
                    kind: BlockKind::Normal
                }
            );
        }
        assert!(filled.contains(Position::new(3, 4)));
        assert!(board.is_empty(3, 3));
        assert_eq!(board.occupied_cells(), filled);
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn test_place_over_occupied_cell_panics() {
        let mut board = Board::from_ascii("#.........");
        board.place(
            ShapeKind::DominoH.shape(),
            Position::new(0, 0),
            ColorToken::Color2,
            BlockKind::Normal,
        );
    }

    #[test]
    #[should_panic(expected = "leaves the board")]
    fn test_place_off_board_panics() {
        let mut board = Board::EMPTY;
        board.place(
            ShapeKind::I5H.shape(),
            Position::new(0, 6),
            ColorToken::Color2,
            BlockKind::Normal,
        );
    }

    #[test]
    fn test_row_and_col_full() {
        let board = Board::from_ascii(
            "
            ##########
            #.........
            #.........
            #.........
            #.........
            #.........
            #.........
            #.........
            #.........
            #.........
            ",
        );
        assert!(board.is_row_full(0));
        assert!(!board.is_row_full(1));
        assert!(board.is_col_full(0));
        assert!(!board.is_col_full(1));
    }

    #[test]
    fn test_special_blocks_count_as_occupied() {
        let board = Board::from_ascii("#B#S######");
        assert!(board.is_row_full(0));
        assert_eq!(board.cell(Position::new(0, 1)).kind(), Some(BlockKind::Bomb));
        assert_eq!(board.cell(Position::new(0, 3)).kind(), Some(BlockKind::Star));
    }

    #[test]
    fn test_clear_restores_empty() {
        let mut board = Board::from_ascii(
            "
            ##########
            ##########
            ",
        );
        board.clear(CellSet::row(0));
        assert!(board.rows().next().unwrap().iter().all(|c| c.is_empty()));
        assert!(board.is_row_full(1));
        assert_eq!(board.occupied_count(), BOARD_SIZE);
    }

    #[test]
    fn test_seed_noise_fills_distinct_neutral_cells() {
        let mut board = Board::EMPTY;
        let mut rng = Pcg32::seed_from_u64(42);
        let seeded = board.seed_noise(5, &mut rng);
        assert_eq!(seeded.len(), 5);
        assert_eq!(board.occupied_cells(), seeded);
        for pos in seeded.iter() {
            assert_eq!(
                board.cell(pos),
                Cell::Occupied {
                    color: ColorToken::Neutral,
                    kind: BlockKind::Normal
                }
            );
        }
        assert_eq!(board.occupied_count(), 5);
    }

    #[test]
    fn test_seed_noise_only_uses_empty_cells() {
        let mut board = Board::from_ascii("SSSSSSSSSS");
        let mut rng = Pcg32::seed_from_u64(1);
        let seeded = board.seed_noise(50, &mut rng);
        assert_eq!(seeded.len(), 50);
        assert!(seeded.is_disjoint(CellSet::row(0)));
        assert!(
            CellSet::row(0)
                .iter()
                .all(|pos| board.cell(pos).kind() == Some(BlockKind::Star))
        );
    }

    #[test]
    fn test_seed_noise_clamps_to_available_cells() {
        let mut board = Board::from_ascii("##########");
        let mut rng = Pcg32::seed_from_u64(3);
        let seeded = board.seed_noise(1000, &mut rng);
        assert_eq!(seeded.len(), 90);
        assert_eq!(board.occupied_cells(), CellSet::ALL);

        let again = board.seed_noise(5, &mut rng);
        assert!(again.is_empty());
    }

    #[test]
    fn test_display_matches_ascii() {
        let art = "#B.S......\n";
        let board = Board::from_ascii(art);
        let rendered = board.to_string();
        assert!(rendered.starts_with(art));
        assert_eq!(rendered.lines().count(), BOARD_SIZE);
    }
}
