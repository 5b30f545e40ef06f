use crate::core::{Board, PieceInstance};

use super::placement::fits_anywhere;

/// Returns true when none of the offered pieces fits anywhere on the board.
///
/// An empty offer is never terminal: the dock refills before the check runs.
#[must_use]
pub fn is_terminal(offered: &[PieceInstance], board: &Board) -> bool {
    !offered.is_empty()
        && offered
            .iter()
            .all(|piece| !fits_anywhere(board, piece.shape()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceId, ShapeKind};

    fn checkerboard() -> Board {
        Board::from_ascii(
            "
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            #.#.#.#.#.
            .#.#.#.#.#
            ",
        )
    }

    #[test]
    fn test_domino_on_checkerboard_is_terminal() {
        let offered = [PieceInstance::normal(PieceId(0), ShapeKind::DominoH)];
        assert!(is_terminal(&offered, &checkerboard()));
    }

    #[test]
    fn test_single_cell_is_never_blocked_by_checkerboard() {
        let offered = [
            PieceInstance::normal(PieceId(0), ShapeKind::DominoH),
            PieceInstance::bomb(PieceId(1)),
        ];
        assert!(!is_terminal(&offered, &checkerboard()));
    }

    #[test]
    fn test_empty_board_is_never_terminal() {
        for kind in ShapeKind::ALL {
            let offered = [PieceInstance::normal(PieceId(0), kind)];
            assert!(!is_terminal(&offered, &Board::EMPTY), "{kind:?}");
        }
    }

    #[test]
    fn test_empty_offer_is_not_terminal() {
        assert!(!is_terminal(&[], &checkerboard()));
    }

    #[test]
    fn test_one_gap_left() {
        let mut art = String::new();
        for _ in 0..9 {
            art.push_str("##########\n");
        }
        art.push_str("#########.\n");
        let board = Board::from_ascii(&art);
        assert!(!is_terminal(&[PieceInstance::star(PieceId(0))], &board));
        assert!(is_terminal(
            &[PieceInstance::normal(PieceId(0), ShapeKind::DominoV)],
            &board
        ));
    }
}
