use corvid_core::{Color, Piece, PieceKind};

use crate::config::Score;

/// A [Piece-Square Table] for weighting piece placement.
///
/// Tables are written from White's point of view with index 0 = `a1`, so the
/// first literal row is the first rank. Black pieces read the same table
/// through a vertical mirror (`index ^ 56`), which flips the rank and keeps
/// the file.
///
/// Values are the classic simplified-evaluation set: pawns want to advance,
/// knights want the center, bishops avoid the rim, rooks like the seventh
/// rank, queens stay flexible, and the king hides behind its pawns.
///
/// [Piece-Square Table]: https://www.chessprogramming.org/Piece-Square_Tables
#[derive(PartialEq, Eq, Debug)]
pub struct PieceSquareTable([Score; 64]);

impl PieceSquareTable {
    /// The bonus for `color`'s piece standing on the square `index`.
    pub const fn bonus(&self, color: Color, index: usize) -> Score {
        match color {
            Color::White => self.0[index],
            Color::Black => self.0[index ^ 56],
        }
    }
}

pub const PAWN_PSQ: PieceSquareTable = PieceSquareTable([
    0, 0, 0, 0, 0, 0, 0, 0, //
    5, 10, 10, -20, -20, 10, 10, 5, //
    5, -5, -10, 0, 0, -10, -5, 5, //
    0, 0, 0, 20, 20, 0, 0, 0, //
    5, 5, 10, 25, 25, 10, 5, 5, //
    10, 10, 20, 30, 30, 20, 10, 10, //
    50, 50, 50, 50, 50, 50, 50, 50, //
    0, 0, 0, 0, 0, 0, 0, 0, //
]);

pub const KNIGHT_PSQ: PieceSquareTable = PieceSquareTable([
    -50, -40, -30, -30, -30, -30, -40, -50, //
    -40, -20, 0, 5, 5, 0, -20, -40, //
    -30, 5, 10, 15, 15, 10, 5, -30, //
    -30, 0, 15, 20, 20, 15, 0, -30, //
    -30, 5, 15, 20, 20, 15, 5, -30, //
    -30, 0, 10, 15, 15, 10, 0, -30, //
    -40, -20, 0, 0, 0, 0, -20, -40, //
    -50, -40, -30, -30, -30, -30, -40, -50, //
]);

pub const BISHOP_PSQ: PieceSquareTable = PieceSquareTable([
    -20, -10, -10, -10, -10, -10, -10, -20, //
    -10, 5, 0, 0, 0, 0, 5, -10, //
    -10, 10, 10, 10, 10, 10, 10, -10, //
    -10, 0, 10, 10, 10, 10, 0, -10, //
    -10, 5, 5, 10, 10, 5, 5, -10, //
    -10, 0, 5, 10, 10, 5, 0, -10, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -20, -10, -10, -10, -10, -10, -10, -20, //
]);

pub const ROOK_PSQ: PieceSquareTable = PieceSquareTable([
    0, 0, 0, 5, 5, 0, 0, 0, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    5, 10, 10, 10, 10, 10, 10, 5, //
    0, 0, 0, 0, 0, 0, 0, 0, //
]);

pub const QUEEN_PSQ: PieceSquareTable = PieceSquareTable([
    -20, -10, -10, -5, -5, -10, -10, -20, //
    -10, 0, 5, 0, 0, 0, 0, -10, //
    -10, 5, 5, 5, 5, 5, 0, -10, //
    0, 0, 5, 5, 5, 5, 0, -5, //
    -5, 0, 5, 5, 5, 5, 0, -5, //
    -10, 0, 5, 5, 5, 5, 0, -10, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -20, -10, -10, -5, -5, -10, -10, -20, //
]);

pub const KING_PSQ: PieceSquareTable = PieceSquareTable([
    20, 30, 10, 0, 0, 10, 30, 20, //
    20, 20, 0, 0, 0, 0, 20, 20, //
    -10, -20, -20, -20, -20, -20, -20, -10, //
    -20, -30, -30, -40, -40, -30, -30, -20, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
]);

/// The placement bonus for `piece` standing on the square `index`.
///
/// Returns `0` for [`Piece::NONE`].
pub fn psq_bonus(piece: Piece, index: usize) -> Score {
    let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
        return 0;
    };

    let table = match kind {
        PieceKind::Pawn => &PAWN_PSQ,
        PieceKind::Knight => &KNIGHT_PSQ,
        PieceKind::Bishop => &BISHOP_PSQ,
        PieceKind::Rook => &ROOK_PSQ,
        PieceKind::Queen => &QUEEN_PSQ,
        PieceKind::King => &KING_PSQ,
    };

    table.bonus(color, index)
}
