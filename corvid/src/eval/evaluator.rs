use corvid_core::{Board, Color, PieceKind, Tile, NUM_TILES};

use super::piece_square_tables::psq_bonus;
use crate::config::Score;

/// Returns the material value of the provided [`PieceKind`], in centipawns.
pub const fn value_of(kind: PieceKind) -> Score {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 350,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// Statically evaluates the position from the side-to-move's perspective.
///
/// Sums material plus placement bonus over every piece, White-positive, then
/// negates for Black to move. Negamax requires the side-to-move perspective:
/// each level of the recursion can then simply negate its child's score.
pub fn evaluate(board: &Board) -> Score {
    let mut score = 0;

    for index in 0..NUM_TILES {
        let piece = board.piece_at(Tile::from_index(index));
        let Some(kind) = piece.kind() else {
            continue;
        };

        let value = value_of(kind) + psq_bonus(piece, index);
        if piece.is_color(Color::White) {
            score += value;
        } else {
            score -= value;
        }
    }

    match board.active_color() {
        Color::White => score,
        Color::Black => -score,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use corvid_core::FEN_STARTPOS;

    #[test]
    fn test_startpos_is_balanced() {
        // The starting position is symmetric, so material and placement cancel.
        assert_eq!(evaluate(&Board::from_fen(FEN_STARTPOS)), 0);
    }

    #[test]
    fn test_perspective_flips_with_side_to_move() {
        // Identical placement; only the side to move differs.
        let white = Board::from_fen("k7/8/8/8/8/8/8/KQ6 w - - 0 1");
        let black = Board::from_fen("k7/8/8/8/8/8/8/KQ6 b - - 0 1");
        assert_eq!(evaluate(&white), -evaluate(&black));
        assert!(evaluate(&white) > 0);
    }

    #[test]
    fn test_color_mirror_negates() {
        // The same material with colors swapped and ranks mirrored must score
        // equal and opposite, including the piece-square bonuses.
        let original = Board::from_fen("k7/pp6/8/3N4/8/8/PPP5/K7 w - - 0 1");
        let mirrored = Board::from_fen("k7/ppp5/8/8/3n4/8/PP6/K7 b - - 0 1");
        assert_eq!(evaluate(&original), evaluate(&mirrored));
    }

    #[test]
    fn test_extra_material_wins() {
        let up_a_rook = Board::from_fen("k7/8/8/8/8/8/8/KR6 w - - 0 1");
        assert!(evaluate(&up_a_rook) >= value_of(PieceKind::Rook) - 50);
    }
}
