use std::fmt;

use serde::{Deserialize, Serialize};

use super::shape::{Shape, ShapeKind};

/// Behaviour attached to a placed block.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum BlockKind {
    /// Plain block; only clears as part of a full line.
    #[default]
    Normal,
    /// Detonates a 5×5 area when cleared as part of a full line.
    Bomb,
    /// Adds one to the clear multiplier when removed.
    Star,
}

/// Opaque display color of a block.
///
/// The engine never interprets colors; it copies them from pieces into board cells
/// and hands them back to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorToken {
    Color1,
    Color2,
    Color3,
    Color4,
    Color5,
    Color6,
    Color7,
    /// Pre-filled noise cells at game start.
    Neutral,
    Bomb,
    Star,
}

/// Identifier of an offered piece, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece offered in the dock.
///
/// Consumed exactly once when placed; its shape cells are copied onto the board with
/// its color and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceInstance {
    id: PieceId,
    shape: Shape,
    color: ColorToken,
    kind: BlockKind,
}

impl PieceInstance {
    #[must_use]
    pub const fn new(id: PieceId, shape: Shape, color: ColorToken, kind: BlockKind) -> Self {
        Self {
            id,
            shape,
            color,
            kind,
        }
    }

    /// A normal piece drawn from the catalog.
    #[must_use]
    pub const fn normal(id: PieceId, shape_kind: ShapeKind) -> Self {
        Self::new(id, shape_kind.shape(), shape_kind.color(), BlockKind::Normal)
    }

    #[must_use]
    pub const fn bomb(id: PieceId) -> Self {
        Self::new(id, Shape::MONO, ColorToken::Bomb, BlockKind::Bomb)
    }

    #[must_use]
    pub const fn star(id: PieceId) -> Self {
        Self::new(id, Shape::MONO, ColorToken::Star, BlockKind::Star)
    }

    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn color(&self) -> ColorToken {
        self.color
    }

    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_pieces_are_single_cell() {
        let bomb = PieceInstance::bomb(PieceId(1));
        let star = PieceInstance::star(PieceId(2));
        assert_eq!(bomb.shape(), Shape::MONO);
        assert_eq!(star.shape(), Shape::MONO);
        assert!(bomb.kind().is_bomb());
        assert!(star.kind().is_star());
        assert_eq!(bomb.color(), ColorToken::Bomb);
        assert_eq!(star.color(), ColorToken::Star);
    }

    #[test]
    fn test_normal_piece_copies_catalog_entry() {
        let piece = PieceInstance::normal(PieceId(3), ShapeKind::O);
        assert_eq!(piece.shape(), ShapeKind::O.shape());
        assert_eq!(piece.color(), ShapeKind::O.color());
        assert!(piece.kind().is_normal());
        assert_eq!(piece.id().to_string(), "#3");
    }
}
