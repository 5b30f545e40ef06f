use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::{
    BOARD_SIZE,
    cell_set::{CellSet, Position},
    piece::ColorToken,
};

/// A piece footprint: the cells it occupies relative to its anchor.
///
/// Offsets are `(row, col)` pairs inside the shape's bounding box, whose top-left
/// corner is the origin. The anchor cell therefore maps to offset `(0, 0)` even for
/// shapes (like some T and J orientations) that leave that corner empty.
///
/// Shapes are immutable and live in static memory, so they are `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    offsets: &'static [(u8, u8)],
}

impl Shape {
    /// The single-cell shape used by bombs and stars.
    pub const MONO: Self = Self::new(&[(0, 0)]);

    /// Creates a shape from static offsets.
    ///
    /// # Panics
    ///
    /// Panics (at compile time for `const` shapes) if the offsets are empty, contain a
    /// duplicate, do not touch both the top and left edges of their bounding box, or do
    /// not fit on the board.
    #[must_use]
    pub const fn new(offsets: &'static [(u8, u8)]) -> Self {
        assert!(!offsets.is_empty(), "shape must have at least one cell");
        let mut min_row = u8::MAX;
        let mut min_col = u8::MAX;
        let mut i = 0;
        while i < offsets.len() {
            let (row, col) = offsets[i];
            assert!(
                (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE,
                "shape does not fit on the board"
            );
            let mut j = i + 1;
            while j < offsets.len() {
                assert!(
                    offsets[j].0 != row || offsets[j].1 != col,
                    "duplicate shape offset"
                );
                j += 1;
            }
            if row < min_row {
                min_row = row;
            }
            if col < min_col {
                min_col = col;
            }
            i += 1;
        }
        assert!(
            min_row == 0 && min_col == 0,
            "shape bounding box must start at the origin"
        );
        Self { offsets }
    }

    /// Number of cells in the shape.
    #[must_use]
    pub const fn len(self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterates `(row, col)` offsets.
    pub fn offsets(self) -> impl Iterator<Item = (usize, usize)> {
        self.offsets
            .iter()
            .map(|&(row, col)| (usize::from(row), usize::from(col)))
    }

    /// Height of the bounding box, in cells.
    #[must_use]
    pub fn height(self) -> usize {
        self.offsets().map(|(row, _)| row + 1).max().unwrap_or(0)
    }

    /// Width of the bounding box, in cells.
    #[must_use]
    pub fn width(self) -> usize {
        self.offsets().map(|(_, col)| col + 1).max().unwrap_or(0)
    }

    #[must_use]
    pub fn contains_offset(self, row: usize, col: usize) -> bool {
        self.offsets().any(|offset| offset == (row, col))
    }

    /// Returns the board cells covered when anchored at `(anchor_row, anchor_col)`.
    ///
    /// Returns `None` if any cell would fall outside the board, including anchors so
    /// far off that the offsets overflow. Occupancy is not checked.
    #[must_use]
    pub fn cells_at(self, anchor_row: i32, anchor_col: i32) -> Option<CellSet> {
        let mut cells = CellSet::EMPTY;
        for (d_row, d_col) in self.offsets {
            let pos = Position::checked(
                anchor_row.checked_add(i32::from(*d_row))?,
                anchor_col.checked_add(i32::from(*d_col))?,
            )?;
            cells.insert(pos);
        }
        Some(cells)
    }
}

/// The normal (non-special) pieces the dock can offer.
///
/// Every orientation is its own kind because pieces never rotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeKind {
    DominoH,
    DominoV,
    I3H,
    I3V,
    Corner3,
    I4H,
    I4V,
    O,
    L0,
    L1,
    L2,
    L3,
    J0,
    J1,
    J2,
    J3,
    T0,
    T1,
    T2,
    T3,
    S0,
    S1,
    Z0,
    Z1,
    I5H,
    I5V,
    P0,
    P1,
    U0,
    U1,
    X,
    V5,
    W,
}

struct CatalogEntry {
    name: &'static str,
    color: ColorToken,
    shape: Shape,
}

const fn entry(
    name: &'static str,
    color: ColorToken,
    offsets: &'static [(u8, u8)],
) -> CatalogEntry {
    CatalogEntry {
        name,
        color,
        shape: Shape::new(offsets),
    }
}

const CATALOG: [CatalogEntry; ShapeKind::LEN] = {
    use ColorToken::{Color1 as C1, Color2 as C2, Color3 as C3, Color4 as C4};
    use ColorToken::{Color5 as C5, Color6 as C6, Color7 as C7};
    [
        // Dominoes
        entry("domino-h", C2, &[(0, 0), (0, 1)]),
        entry("domino-v", C2, &[(0, 0), (1, 0)]),
        // Trominoes
        entry("i3-h", C3, &[(0, 0), (0, 1), (0, 2)]),
        entry("i3-v", C3, &[(0, 0), (1, 0), (2, 0)]),
        entry("corner3", C6, &[(0, 0), (0, 1), (1, 0)]),
        // Tetrominoes
        entry("i4-h", C2, &[(0, 0), (0, 1), (0, 2), (0, 3)]),
        entry("i4-v", C2, &[(0, 0), (1, 0), (2, 0), (3, 0)]),
        entry("o", C5, &[(0, 0), (0, 1), (1, 0), (1, 1)]),
        entry("l0", C6, &[(0, 0), (1, 0), (2, 0), (2, 1)]),
        entry("l1", C6, &[(0, 0), (0, 1), (0, 2), (1, 0)]),
        entry("l2", C6, &[(0, 0), (0, 1), (1, 1), (2, 1)]),
        entry("l3", C6, &[(1, 0), (1, 1), (1, 2), (0, 2)]),
        entry("j0", C1, &[(0, 1), (1, 1), (2, 1), (2, 0)]),
        entry("j1", C1, &[(0, 0), (1, 0), (1, 1), (1, 2)]),
        entry("j2", C1, &[(0, 0), (0, 1), (1, 0), (2, 0)]),
        entry("j3", C1, &[(0, 0), (0, 1), (0, 2), (1, 2)]),
        entry("t0", C7, &[(0, 0), (0, 1), (0, 2), (1, 1)]),
        entry("t1", C7, &[(1, 0), (1, 1), (1, 2), (0, 1)]),
        entry("t2", C7, &[(0, 0), (1, 0), (2, 0), (1, 1)]),
        entry("t3", C7, &[(0, 1), (1, 1), (2, 1), (1, 0)]),
        entry("s0", C3, &[(0, 1), (0, 2), (1, 0), (1, 1)]),
        entry("s1", C3, &[(0, 0), (1, 0), (1, 1), (2, 1)]),
        entry("z0", C4, &[(0, 0), (0, 1), (1, 1), (1, 2)]),
        entry("z1", C4, &[(0, 1), (1, 1), (1, 0), (2, 0)]),
        // Pentominoes
        entry("i5-h", C2, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]),
        entry("i5-v", C2, &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]),
        entry("p0", C5, &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]),
        entry("p1", C5, &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 1)]),
        entry("u0", C1, &[(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)]),
        entry("u1", C1, &[(0, 0), (0, 1), (1, 0), (2, 0), (2, 1)]),
        entry("x", C4, &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]),
        entry("v5", C6, &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]),
        entry("w", C3, &[(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)]),
    ]
};

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shapes in the catalog.
    pub const LEN: usize = 33;

    #[rustfmt::skip]
    pub const ALL: [ShapeKind; Self::LEN] = {
        use ShapeKind::{
            Corner3, DominoH, DominoV, I3H, I3V, I4H, I4V, I5H, I5V, J0, J1, J2, J3, L0, L1, L2,
            L3, O, P0, P1, S0, S1, T0, T1, T2, T3, U0, U1, V5, W, X, Z0, Z1,
        };
        [
            DominoH, DominoV,
            I3H, I3V, Corner3,
            I4H, I4V, O, L0, L1, L2, L3, J0, J1, J2, J3, T0, T1, T2, T3, S0, S1, Z0, Z1,
            I5H, I5V, P0, P1, U0, U1, X, V5, W,
        ]
    };

    #[must_use]
    pub const fn shape(self) -> Shape {
        CATALOG[self as usize].shape
    }

    #[must_use]
    pub const fn color(self) -> ColorToken {
        CATALOG[self as usize].color
    }

    /// Short lowercase name, stable across versions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        CATALOG[self as usize].name
    }
}

/// Draws a catalog shape uniformly at random.
///
/// # Example
///
/// ```
/// use blockfit_engine::draw_random_shape;
///
/// let kind = draw_random_shape(&mut rand::rng());
/// assert!((2..=5).contains(&kind.shape().len()));
/// ```
pub fn draw_random_shape<R: Rng + ?Sized>(rng: &mut R) -> ShapeKind {
    rng.random()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i, "{kind:?} is out of order");
        }
    }

    #[test]
    fn test_catalog_sizes() {
        let mut by_size = [0; 6];
        for kind in ShapeKind::ALL {
            let len = kind.shape().len();
            assert!((2..=5).contains(&len), "{kind:?} has {len} cells");
            by_size[len] += 1;
        }
        assert_eq!(by_size, [0, 0, 2, 3, 19, 9]);
    }

    #[test]
    fn test_catalog_shapes_are_distinct() {
        for (i, a) in ShapeKind::ALL.iter().enumerate() {
            for b in &ShapeKind::ALL[i + 1..] {
                let a_cells = a.shape().cells_at(0, 0).unwrap();
                let b_cells = b.shape().cells_at(0, 0).unwrap();
                assert_ne!(a_cells, b_cells, "{a:?} and {b:?} share a footprint");
            }
        }
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = ShapeKind::ALL.iter().map(|kind| kind.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ShapeKind::LEN);
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(ShapeKind::I5H.shape().width(), 5);
        assert_eq!(ShapeKind::I5H.shape().height(), 1);
        assert_eq!(ShapeKind::X.shape().width(), 3);
        assert_eq!(ShapeKind::X.shape().height(), 3);
        assert_eq!(Shape::MONO.width(), 1);
        assert!(!ShapeKind::X.shape().contains_offset(0, 0));
        assert!(ShapeKind::X.shape().contains_offset(1, 1));
    }

    #[test]
    fn test_cells_at_rejects_out_of_bounds() {
        let shape = ShapeKind::I4H.shape();
        assert!(shape.cells_at(0, 6).is_some());
        assert!(shape.cells_at(0, 7).is_none());
        assert!(shape.cells_at(-1, 0).is_none());
        assert_eq!(shape.cells_at(9, 0).unwrap().len(), 4);
    }

    #[test]
    fn test_cells_at_rejects_overflowing_anchor() {
        let shape = ShapeKind::X.shape();
        assert!(shape.cells_at(i32::MAX, 0).is_none());
        assert!(shape.cells_at(0, i32::MAX - 1).is_none());
        assert!(shape.cells_at(i32::MAX, i32::MAX).is_none());
    }

    #[test]
    fn test_random_draw_covers_catalog() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; ShapeKind::LEN];
        for _ in 0..5000 {
            seen[draw_random_shape(&mut rng) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
