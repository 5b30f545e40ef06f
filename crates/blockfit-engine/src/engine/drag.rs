use crate::{
    DragError,
    core::{Board, PieceId, Shape},
};

use super::{
    game_session::PlacementOutcome,
    placement::{PointerPosition, SnapTarget, resolve_snap},
};

/// Where a drag gesture is in its lifecycle.
///
/// `Idle -> Dragging -> Resolving -> Idle`. A drag may also be cancelled from
/// `Dragging` straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Default, derive_more::IsVariant)]
pub enum DragState {
    #[default]
    Idle,
    /// A piece is following the pointer. `target` is recomputed on every move.
    Dragging {
        piece: PieceId,
        pointer: Option<PointerPosition>,
        target: Option<SnapTarget>,
    },
    /// The piece was released and the drop is being committed.
    Resolving {
        piece: PieceId,
        target: Option<SnapTarget>,
    },
}

impl DragState {
    /// The piece being dragged or resolved, if any.
    #[must_use]
    pub const fn piece(&self) -> Option<PieceId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { piece, .. } | DragState::Resolving { piece, .. } => Some(*piece),
        }
    }

    /// The current drop target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<SnapTarget> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { target, .. } | DragState::Resolving { target, .. } => *target,
        }
    }
}

/// Result of releasing a dragged piece.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece was committed to the board.
    Placed(PlacementOutcome),
    /// No valid target; the piece went back to the dock untouched.
    Returned(PieceId),
}

/// Drag gesture tracker.
///
/// Owns only the gesture; validity and commits go through the session.
#[derive(Debug, Clone, Default)]
pub(crate) struct Drag {
    state: DragState,
}

impl Drag {
    pub(crate) const fn state(&self) -> &DragState {
        &self.state
    }

    pub(crate) fn begin(&mut self, piece: PieceId) -> Result<(), DragError> {
        if let Some(current) = self.state.piece() {
            return Err(DragError::AlreadyDragging { piece: current });
        }
        self.state = DragState::Dragging {
            piece,
            pointer: None,
            target: None,
        };
        Ok(())
    }

    pub(crate) fn update(
        &mut self,
        board: &Board,
        shape: Shape,
        position: PointerPosition,
    ) -> Result<Option<SnapTarget>, DragError> {
        let DragState::Dragging {
            pointer, target, ..
        } = &mut self.state
        else {
            return Err(DragError::NotDragging);
        };
        *pointer = Some(position);
        *target = resolve_snap(board, shape, position);
        Ok(*target)
    }

    /// Moves `Dragging` to `Resolving` and returns the piece and its final target.
    pub(crate) fn release(&mut self) -> Result<(PieceId, Option<SnapTarget>), DragError> {
        let DragState::Dragging { piece, target, .. } = self.state else {
            return Err(DragError::NotDragging);
        };
        self.state = DragState::Resolving { piece, target };
        Ok((piece, target))
    }

    /// Returns to `Idle` from any state, yielding the piece that was held.
    pub(crate) fn reset(&mut self) -> Option<PieceId> {
        let piece = self.state.piece();
        self.state = DragState::Idle;
        piece
    }
}
