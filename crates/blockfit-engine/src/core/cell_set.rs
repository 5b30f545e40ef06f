use std::{
    fmt,
    ops::{BitAnd, BitOr, BitOrAssign, Sub},
};

use serde::{Deserialize, Serialize};

use super::{BOARD_SIZE, CELL_COUNT};

/// A cell coordinate on the board.
///
/// `row` grows downward and `col` grows rightward, both in `0..BOARD_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: u8,
    col: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::checked(i32::from(raw.row), i32::from(raw.col))
            .ok_or_else(|| format!("position out of board: ({}, {})", raw.row, raw.col))
    }
}

impl Position {
    /// Creates a position.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside the board.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn new(row: usize, col: usize) -> Self {
        assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Self {
            row: row as u8,
            col: col as u8,
        }
    }

    /// Creates a position from signed coordinates, returning `None` when out of bounds.
    #[must_use]
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < BOARD_SIZE && col < BOARD_SIZE).then(|| Self::new(row, col))
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row as usize
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col as usize
    }

    /// Returns `(row, col)` as signed coordinates, for offset arithmetic.
    #[must_use]
    pub fn signed(self) -> (i32, i32) {
        (i32::from(self.row), i32::from(self.col))
    }

    /// Row-major index in `0..CELL_COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::new(index / BOARD_SIZE, index % BOARD_SIZE)
    }

    /// Returns the position shifted by the given offset, if it stays on the board.
    #[must_use]
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Self::checked(i32::from(self.row) + d_row, i32::from(self.col) + d_col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const ROW_MASK: u128 = (1 << BOARD_SIZE) - 1;
const ALL_MASK: u128 = (1 << CELL_COUNT) - 1;

/// A set of board cells stored as a 100-bit mask.
///
/// Bit `row * BOARD_SIZE + col` is set when the cell at `(row, col)` is a member.
/// Used for occupancy tracking, clear sets, and every other "which cells" question
/// the engine asks, so set algebra and equality are single integer operations.
///
/// # Example
///
/// ```
/// use blockfit_engine::{CellSet, Position};
///
/// let cross = CellSet::row(0) | CellSet::col(0);
/// assert_eq!(cross.len(), 19);
/// assert!(cross.contains(Position::new(0, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSet {
    bits: u128,
}

impl CellSet {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const ALL: Self = Self { bits: ALL_MASK };

    /// Every cell of the given row.
    #[must_use]
    pub const fn row(row: usize) -> Self {
        assert!(row < BOARD_SIZE);
        Self {
            bits: ROW_MASK << (row * BOARD_SIZE),
        }
    }

    /// Every cell of the given column.
    #[must_use]
    pub const fn col(col: usize) -> Self {
        assert!(col < BOARD_SIZE);
        let mut bits = 0;
        let mut row = 0;
        while row < BOARD_SIZE {
            bits |= 1 << (row * BOARD_SIZE + col);
            row += 1;
        }
        Self { bits }
    }

    /// Every cell within Chebyshev distance `radius` of `center`, clipped to the board.
    #[must_use]
    pub fn square_around(center: Position, radius: usize) -> Self {
        let last = BOARD_SIZE - 1;
        let rows = center.row().saturating_sub(radius)..=usize::min(center.row() + radius, last);
        let cols = center.col().saturating_sub(radius)..=usize::min(center.col() + radius, last);
        let mut set = Self::EMPTY;
        for row in rows {
            for col in cols.clone() {
                set.insert(Position::new(row, col));
            }
        }
        set
    }

    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        self.bits & (1 << pos.index()) != 0
    }

    pub const fn insert(&mut self, pos: Position) {
        self.bits |= 1 << pos.index();
    }

    pub const fn remove(&mut self, pos: Position) {
        self.bits &= !(1 << pos.index());
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns true when every member of `other` is also a member of `self`.
    #[must_use]
    pub const fn is_superset(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    #[must_use]
    pub const fn is_disjoint(self, other: Self) -> bool {
        self.bits & other.bits == 0
    }

    /// Iterates members in row-major order.
    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bits = self.bits;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Position::from_index(index))
        })
    }
}

impl BitOr for CellSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitAnd for CellSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl Sub for CellSet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & !rhs.bits,
        }
    }
}

impl FromIterator<Position> for CellSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

// Serialized as the list of member positions; compact enough for event logs and tests.
impl Serialize for CellSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CellSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let positions = Vec::<Position>::deserialize(deserializer)?;
        Ok(positions.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_index_roundtrip() {
        for index in 0..CELL_COUNT {
            assert_eq!(Position::from_index(index).index(), index);
        }
    }

    #[test]
    fn test_position_checked_rejects_out_of_bounds() {
        assert_eq!(Position::checked(-1, 0), None);
        assert_eq!(Position::checked(0, -1), None);
        assert_eq!(Position::checked(10, 0), None);
        assert_eq!(Position::checked(0, 10), None);
        assert_eq!(Position::checked(9, 9), Some(Position::new(9, 9)));
    }

    #[test]
    fn test_position_offset() {
        let pos = Position::new(0, 9);
        assert_eq!(pos.offset(1, 0), Some(Position::new(1, 9)));
        assert_eq!(pos.offset(0, 1), None);
        assert_eq!(pos.offset(-1, 0), None);
    }

    #[test]
    fn test_row_and_col_masks() {
        for i in 0..BOARD_SIZE {
            let row = CellSet::row(i);
            let col = CellSet::col(i);
            assert_eq!(row.len(), BOARD_SIZE);
            assert_eq!(col.len(), BOARD_SIZE);
            assert!(row.iter().all(|pos| pos.row() == i));
            assert!(col.iter().all(|pos| pos.col() == i));
        }
        assert_eq!((CellSet::row(3) & CellSet::col(7)).len(), 1);
    }

    #[test]
    fn test_all_contains_every_cell() {
        assert_eq!(CellSet::ALL.len(), CELL_COUNT);
        let union = (0..BOARD_SIZE).fold(CellSet::EMPTY, |acc, r| acc | CellSet::row(r));
        assert_eq!(union, CellSet::ALL);
    }

    #[test]
    fn test_square_around_center() {
        let square = CellSet::square_around(Position::new(5, 5), 2);
        assert_eq!(square.len(), 25);
        assert!(square.contains(Position::new(3, 3)));
        assert!(square.contains(Position::new(7, 7)));
        assert!(!square.contains(Position::new(2, 5)));
    }

    #[test]
    fn test_square_around_clipped_at_corner() {
        let square = CellSet::square_around(Position::new(0, 0), 2);
        assert_eq!(square.len(), 9);
        let square = CellSet::square_around(Position::new(9, 4), 2);
        assert_eq!(square.len(), 15);
    }

    #[test]
    fn test_insert_remove_contains() {
        let mut set = CellSet::EMPTY;
        let pos = Position::new(4, 2);
        assert!(!set.contains(pos));
        set.insert(pos);
        set.insert(pos);
        assert!(set.contains(pos));
        assert_eq!(set.len(), 1);
        set.remove(pos);
        assert!(set.is_empty());
    }

    #[test]
    fn test_iter_is_row_major() {
        let set: CellSet = [Position::new(2, 1), Position::new(0, 5), Position::new(2, 0)]
            .into_iter()
            .collect();
        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            [Position::new(0, 5), Position::new(2, 0), Position::new(2, 1)]
        );
    }

    #[test]
    fn test_set_algebra() {
        let a = CellSet::row(0);
        let b = CellSet::col(0);
        assert_eq!((a - b).len(), 9);
        assert!((a | b).is_superset(a));
        assert!(!a.is_disjoint(b));
        assert!(CellSet::row(1).is_disjoint(a));
    }

    #[test]
    fn test_serialization_lists_positions() {
        let set: CellSet = [Position::new(1, 2), Position::new(0, 3)].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[{"row":0,"col":3},{"row":1,"col":2}]"#);
        let back: CellSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_position_deserialize_rejects_out_of_board() {
        let result: Result<Position, _> = serde_json::from_str(r#"{"row":10,"col":0}"#);
        assert!(result.is_err());
    }
}
