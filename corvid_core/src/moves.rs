use std::fmt;

use arrayvec::ArrayVec;

use super::{Piece, PieceKind, Tile};

/// Upper bound on the number of pseudo-legal moves in any position.
///
/// The most moves known in any legal chess position is 218, so 256 leaves
/// headroom and keeps the buffer a round power of two.
pub const MAX_MOVES: usize = 256;

/// A fixed-capacity move buffer, filled by the generator without allocating.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// A move on a chess board.
///
/// The generator stamps every move with the piece being moved and (for
/// captures) the piece being captured, so that unmaking a move never has to
/// recompute either. For an en-passant capture, `captured` holds the victim
/// pawn even though the destination square is empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Tile,
    pub to: Tile,
    /// The piece placed on `to` instead of the pawn, or [`Piece::NONE`].
    pub promotion: Piece,
    /// The piece removed from the board, or [`Piece::NONE`].
    pub captured: Piece,
    /// The piece standing on `from` before the move.
    pub moved: Piece,
}

impl Move {
    /// The null move: nothing moves. Renders as `0000` in UCI.
    pub const fn null() -> Self {
        Self {
            from: Tile::new(0, 0),
            to: Tile::new(0, 0),
            promotion: Piece::NONE,
            captured: Piece::NONE,
            moved: Piece::NONE,
        }
    }

    /// Creates a non-capturing move.
    pub const fn quiet(from: Tile, to: Tile, moved: Piece) -> Self {
        Self {
            from,
            to,
            promotion: Piece::NONE,
            captured: Piece::NONE,
            moved,
        }
    }

    /// Creates a capturing move.
    pub const fn capture(from: Tile, to: Tile, moved: Piece, captured: Piece) -> Self {
        Self {
            from,
            to,
            promotion: Piece::NONE,
            captured,
            moved,
        }
    }

    /// This move with its promotion piece set.
    pub const fn promoting_to(mut self, promotion: Piece) -> Self {
        self.promotion = promotion;
        self
    }

    /// Returns `true` for the degenerate "from equals to" move.
    pub fn is_null(&self) -> bool {
        self.from == self.to
    }

    /// Returns `true` if this move captures a piece (including en passant).
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns `true` if this move promotes a pawn.
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Returns `true` if both moves use the same squares, regardless of how
    /// they were generated. Used to match killer and hash moves across
    /// positions that share a ply.
    pub fn matches(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// Converts this move to its UCI string: source, destination, and an
    /// optional promotion letter. The null move becomes `0000`.
    ///
    /// # Example
    /// ```
    /// # use corvid_core::{Color, Move, Piece, PieceKind, Tile};
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn);
    /// let queen = Piece::new(Color::White, PieceKind::Queen);
    /// let push = Move::quiet(Tile::new(4, 6), Tile::new(4, 7), pawn).promoting_to(queen);
    /// assert_eq!(push.to_uci(), "e7e8q");
    /// assert_eq!(Move::null().to_uci(), "0000");
    /// ```
    pub fn to_uci(&self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }

        let mut uci = format!("{}{}", self.from, self.to);
        if let Some(kind) = self.promotion.kind() {
            uci.push(match kind {
                PieceKind::Queen => 'q',
                PieceKind::Rook => 'r',
                PieceKind::Bishop => 'b',
                PieceKind::Knight => 'n',
                _ => 'q',
            });
        }
        uci
    }
}

impl Default for Move {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?} x {:?})", self.to_uci(), self.moved, self.captured)
    }
}
