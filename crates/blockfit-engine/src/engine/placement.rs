use serde::{Deserialize, Serialize};

use crate::core::{Board, CELL_COUNT, Position, Shape};

/// Maximum distance, in cells, between the pointer and a neighbouring anchor for the
/// snap search to accept it.
pub const SNAP_RADIUS: f64 = 1.0;

/// Distance, in cells, under which an exactly-valid target also pulls the dragged
/// piece onto the grid.
pub const VISUAL_SNAP_RADIUS: f64 = 0.5;

/// Anchors are clamped to this band, one board length around the grid. Every anchor
/// outside it is equally off the board.
const ANCHOR_MIN: f64 = -10.0;
const ANCHOR_MAX: f64 = 20.0;

const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Continuous position of a dragged piece's bounding-box origin, in cell units.
///
/// `(0.0, 0.0)` is the top-left corner of the board's top-left cell; one unit is one
/// cell. The input layer converts pixels into this space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub row: f64,
    pub col: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// The pointer position exactly on top of `anchor`.
    #[must_use]
    pub fn at(anchor: Position) -> Self {
        let (row, col) = anchor.signed();
        Self::new(f64::from(row), f64::from(col))
    }

    /// The anchor cell the pointer is over: the one whose origin is nearest.
    ///
    /// Coordinates far off the board are clamped to a band around it, so the result
    /// stays small enough to offset safely. A NaN coordinate maps to 0.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn nearest_cell(self) -> (i32, i32) {
        let nearest = |x: f64| (x + 0.5).floor().clamp(ANCHOR_MIN, ANCHOR_MAX) as i32;
        (nearest(self.row), nearest(self.col))
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.row.is_finite() && self.col.is_finite()
    }

    /// Euclidean distance to the origin of the cell at `(row, col)`.
    #[must_use]
    pub fn distance_to(self, row: i32, col: i32) -> f64 {
        f64::hypot(self.row - f64::from(row), self.col - f64::from(col))
    }
}

/// A resolved drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapTarget {
    /// Where the piece will be anchored if dropped now.
    pub anchor: Position,
    /// Whether the dragged piece should be drawn pulled onto `anchor`.
    ///
    /// Always true for neighbour corrections; for exact matches only when the pointer
    /// is within [`VISUAL_SNAP_RADIUS`].
    pub snapped: bool,
}

/// Returns true iff every cell of `shape` anchored at `(anchor_row, anchor_col)` lies
/// on the board and is empty.
///
/// The check is atomic: a single off-board or occupied cell rejects the placement.
///
/// # Example
///
/// ```
/// use blockfit_engine::{Board, ShapeKind, is_valid_placement};
///
/// let board = Board::from_ascii("#.........");
/// let domino = ShapeKind::DominoH.shape();
/// assert!(is_valid_placement(&board, domino, 0, 1));
/// assert!(!is_valid_placement(&board, domino, 0, 0));
/// assert!(!is_valid_placement(&board, domino, 0, 9));
/// ```
#[must_use]
pub fn is_valid_placement(board: &Board, shape: Shape, anchor_row: i32, anchor_col: i32) -> bool {
    shape
        .cells_at(anchor_row, anchor_col)
        .is_some_and(|cells| cells.is_disjoint(board.occupied_cells()))
}

/// Iterates every anchor where `shape` can be placed, in row-major order.
pub fn valid_anchors(board: &Board, shape: Shape) -> impl Iterator<Item = Position> + '_ {
    (0..CELL_COUNT).map(Position::from_index).filter(move |pos| {
        let (row, col) = pos.signed();
        is_valid_placement(board, shape, row, col)
    })
}

/// Returns true if `shape` fits anywhere on the board.
#[must_use]
pub fn fits_anywhere(board: &Board, shape: Shape) -> bool {
    valid_anchors(board, shape).next().is_some()
}

/// Resolves the drop target for a piece dragged to `pointer`.
///
/// 1. The cell under the pointer wins if the placement there is valid.
/// 2. Otherwise the 8 neighbouring anchors are searched, and the valid one nearest
///    to the pointer is chosen (first in row-major order on ties).
/// 3. That neighbour is accepted only when closer than [`SNAP_RADIUS`].
///
/// Returns `None` when there is no acceptable target, including for a non-finite
/// pointer; the piece then goes back to the dock.
#[must_use]
pub fn resolve_snap(board: &Board, shape: Shape, pointer: PointerPosition) -> Option<SnapTarget> {
    if !pointer.is_finite() {
        return None;
    }
    let (row, col) = pointer.nearest_cell();
    if is_valid_placement(board, shape, row, col) {
        let anchor = Position::checked(row, col)?;
        return Some(SnapTarget {
            anchor,
            snapped: pointer.distance_to(row, col) < VISUAL_SNAP_RADIUS,
        });
    }

    NEIGHBOR_OFFSETS
        .iter()
        .map(|&(d_row, d_col)| (row + d_row, col + d_col))
        .filter(|&(r, c)| is_valid_placement(board, shape, r, c))
        .map(|(r, c)| (pointer.distance_to(r, c), r, c))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .filter(|&(distance, _, _)| distance < SNAP_RADIUS)
        .and_then(|(_, r, c)| Position::checked(r, c))
        .map(|anchor| SnapTarget {
            anchor,
            snapped: true,
        })
}

/// Lazily resolves a target for each pointer position of a drag path.
///
/// The iterator borrows the board, so it is recomputed from scratch (restarted) by
/// calling this again after the board changes.
pub fn snap_targets<'a, I>(
    board: &'a Board,
    shape: Shape,
    path: I,
) -> impl Iterator<Item = Option<SnapTarget>> + 'a
where
    I: IntoIterator<Item = PointerPosition>,
    I::IntoIter: 'a,
{
    path.into_iter()
        .map(move |pointer| resolve_snap(board, shape, pointer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShapeKind;

    /// Reference check written directly against the cell predicate.
    fn brute_force_valid(board: &Board, shape: Shape, row: i32, col: i32) -> bool {
        shape.offsets().all(|(d_row, d_col)| {
            let r = row + i32::try_from(d_row).unwrap();
            let c = col + i32::try_from(d_col).unwrap();
            board.is_empty(r, c)
        })
    }

    #[test]
    fn test_validity_matches_cell_predicate_exhaustively() {
        let boards = [
            Board::EMPTY,
            Board::from_ascii(
                "
                #.........
                .#........
                ..#.......
                ...#......
                ....#.....
                .....#....
                ......#...
                .......#..
                ........#.
                .........#
                ",
            ),
            Board::from_ascii(
                "
                ##.##.##.#
                ..........
                #B#S#.....
                ",
            ),
        ];
        for board in &boards {
            for kind in ShapeKind::ALL {
                let shape = kind.shape();
                for row in -2..12 {
                    for col in -2..12 {
                        assert_eq!(
                            is_valid_placement(board, shape, row, col),
                            brute_force_valid(board, shape, row, col),
                            "{kind:?} at ({row}, {col}) on\n{board}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_violation_invalidates_placement() {
        let board = Board::from_ascii("...#......");
        let shape = ShapeKind::I4H.shape();
        assert!(!is_valid_placement(&board, shape, 0, 0));
        assert!(!is_valid_placement(&board, shape, 0, 3));
        assert!(is_valid_placement(&board, shape, 0, 4));
        assert!(is_valid_placement(&board, shape, 1, 0));
    }

    #[test]
    fn test_valid_anchors_on_empty_board() {
        let board = Board::EMPTY;
        assert_eq!(valid_anchors(&board, Shape::MONO).count(), 100);
        assert_eq!(valid_anchors(&board, ShapeKind::I5H.shape()).count(), 60);
        assert_eq!(valid_anchors(&board, ShapeKind::O.shape()).count(), 81);
    }

    #[test]
    fn test_exact_target_wins() {
        let board = Board::EMPTY;
        let target = resolve_snap(&board, ShapeKind::O.shape(), PointerPosition::new(3.2, 4.1));
        assert_eq!(
            target,
            Some(SnapTarget {
                anchor: Position::new(3, 4),
                snapped: true,
            })
        );
    }

    #[test]
    fn test_exact_target_far_from_grid_is_not_snapped() {
        let board = Board::EMPTY;
        let target =
            resolve_snap(&board, ShapeKind::O.shape(), PointerPosition::new(3.45, 4.45)).unwrap();
        assert_eq!(target.anchor, Position::new(3, 4));
        assert!(!target.snapped);
    }

    #[test]
    fn test_neighbor_snap_near_right_edge() {
        // A horizontal I4 hovering slightly past the right edge snaps back onto the board.
        let board = Board::EMPTY;
        let pointer = PointerPosition::new(0.0, 6.6);
        assert_eq!(pointer.nearest_cell(), (0, 7));
        let target = resolve_snap(&board, ShapeKind::I4H.shape(), pointer).unwrap();
        assert_eq!(target.anchor, Position::new(0, 6));
        assert!(target.snapped);
    }

    #[test]
    fn test_neighbor_snap_picks_nearest() {
        // Anchor (1, 1) is blocked; (1, 2) is closer to the pointer than (1, 0).
        let board = Board::from_ascii(
            "
            ..........
            .#........
            ",
        );
        let pointer = PointerPosition::new(1.0, 1.3);
        let target = resolve_snap(&board, Shape::MONO, pointer).unwrap();
        assert_eq!(target.anchor, Position::new(1, 2));
    }

    #[test]
    fn test_neighbor_ties_resolve_in_row_major_order() {
        let board = Board::from_ascii(
            "
            ..........
            .#........
            ",
        );
        // (1, 2) and (2, 1) are equally close; (1, 2) comes first.
        let target = resolve_snap(&board, Shape::MONO, PointerPosition::new(1.4, 1.4)).unwrap();
        assert_eq!(target.anchor, Position::new(1, 2));
    }

    #[test]
    fn test_no_target_when_neighbors_too_far() {
        // The free neighbours sit a full cell away from the pointer.
        let board = Board::from_ascii(
            "
            #.#.......
            ###.......
            #.#.......
            ",
        );
        assert_eq!(
            resolve_snap(&board, Shape::MONO, PointerPosition::new(1.0, 1.0)),
            None
        );
    }

    #[test]
    fn test_no_target_far_off_board() {
        let board = Board::EMPTY;
        assert_eq!(
            resolve_snap(&board, Shape::MONO, PointerPosition::new(-5.0, 2.0)),
            None
        );
    }

    #[test]
    fn test_nearest_cell_is_clamped() {
        assert_eq!(PointerPosition::new(1e12, -1e12).nearest_cell(), (20, -10));
        assert_eq!(
            PointerPosition::new(f64::INFINITY, f64::NEG_INFINITY).nearest_cell(),
            (20, -10)
        );
        assert_eq!(PointerPosition::new(3.4, 6.6).nearest_cell(), (3, 7));
    }

    #[test]
    fn test_no_target_for_extreme_pointers() {
        let board = Board::EMPTY;
        for pointer in [
            PointerPosition::new(1e12, 0.0),
            PointerPosition::new(0.0, -1e12),
            PointerPosition::new(f64::MAX, f64::MAX),
            PointerPosition::new(f64::INFINITY, 0.0),
            PointerPosition::new(f64::NAN, 0.0),
            PointerPosition::new(0.0, f64::NAN),
        ] {
            assert_eq!(resolve_snap(&board, Shape::MONO, pointer), None, "{pointer:?}");
        }
    }

    #[test]
    fn test_anchor_near_integer_limits_is_invalid() {
        let board = Board::EMPTY;
        let shape = ShapeKind::X.shape();
        assert!(!is_valid_placement(&board, shape, i32::MAX, 0));
        assert!(!is_valid_placement(&board, shape, 0, i32::MAX - 1));
        assert!(!is_valid_placement(&board, shape, i32::MIN, i32::MIN));
    }

    #[test]
    fn test_snap_targets_is_lazy_and_restartable() {
        let board = Board::EMPTY;
        let path = [
            PointerPosition::new(-3.0, 0.0),
            PointerPosition::new(-0.6, 0.0),
            PointerPosition::new(0.0, 0.0),
        ];
        let targets: Vec<_> = snap_targets(&board, Shape::MONO, path).collect();
        assert_eq!(targets[0], None);
        assert_eq!(targets[1].map(|t| t.anchor), Some(Position::new(0, 0)));
        assert_eq!(targets[2].map(|t| t.anchor), Some(Position::new(0, 0)));

        let again: Vec<_> = snap_targets(&board, Shape::MONO, path).collect();
        assert_eq!(again, targets);
    }
}
