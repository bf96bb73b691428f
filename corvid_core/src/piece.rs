use std::fmt;

use anyhow::{bail, Result};

/// Number of distinct `(color, kind)` piece combinations.
pub const NUM_PIECES: usize = 12;

/// Represents the color of a player or piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The bit pattern of this [`Color`] inside a [`Piece`]'s encoding.
    pub const fn bits(&self) -> u8 {
        match self {
            Self::White => 0b0000_1000,
            Self::Black => 0b0001_0000,
        }
    }

    /// Returns `true` if this [`Color`] is White.
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns `true` if this [`Color`] is Black.
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns this [`Color`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use corvid_core::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The rank direction this color's pawns push towards: `1` for White, `-1` for Black.
    pub const fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    /// Formats as the FEN active-color field: `w` or `b`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "w"),
            Self::Black => write!(f, "b"),
        }
    }
}

/// The kind of a chess piece, matching the low three bits of a [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    /// Creates a new [`PieceKind`] from a set of bits, if they name a kind.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Self::Pawn),
            2 => Some(Self::Knight),
            3 => Some(Self::Bishop),
            4 => Some(Self::Rook),
            5 => Some(Self::Queen),
            6 => Some(Self::King),
            _ => None,
        }
    }

    /// A zero-based ordinal in `0..6`, used for table lookups.
    pub const fn index(&self) -> usize {
        *self as usize - 1
    }
}

/// A piece encoded in a single byte: kind in bits 0-2, color in bits 3-4.
///
/// [`Piece::NONE`] (all bits zero) marks an empty square and has no color.
///
/// # Example
/// ```
/// # use corvid_core::{Color, Piece, PieceKind};
/// let knight = Piece::new(Color::Black, PieceKind::Knight);
/// assert_eq!(knight.symbol(), 'n');
/// assert_eq!(knight.kind(), Some(PieceKind::Knight));
/// assert!(Piece::NONE.is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    /// The empty-square marker.
    pub const NONE: Self = Self(0);

    const KIND_MASK: u8 = 0b0000_0111;
    const COLOR_MASK: u8 = 0b0001_1000;

    /// Creates a new [`Piece`] of the given color and kind.
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self(color.bits() | kind as u8)
    }

    /// Returns `true` if this is [`Piece::NONE`].
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this piece occupies a square.
    pub const fn is_some(&self) -> bool {
        self.0 != 0
    }

    /// The kind of this piece, or `None` for [`Piece::NONE`].
    pub const fn kind(&self) -> Option<PieceKind> {
        PieceKind::from_bits(self.0 & Self::KIND_MASK)
    }

    /// The color of this piece, or `None` for [`Piece::NONE`].
    pub const fn color(&self) -> Option<Color> {
        match self.0 & Self::COLOR_MASK {
            0b0000_1000 => Some(Color::White),
            0b0001_0000 => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns `true` if this piece is of `kind`. [`Piece::NONE`] is of no kind.
    pub const fn is_kind(&self, kind: PieceKind) -> bool {
        self.0 & Self::KIND_MASK == kind as u8
    }

    /// Returns `true` if this piece is of `color`. [`Piece::NONE`] has no color.
    pub const fn is_color(&self, color: Color) -> bool {
        self.0 & Self::COLOR_MASK == color.bits()
    }

    /// Returns `true` if this piece is exactly `color`'s `kind`.
    pub const fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.0 == color.bits() | kind as u8
    }

    /// Index into the 12-entry Zobrist piece tables: kind ordinal, plus 6 for Black.
    ///
    /// Must not be called on [`Piece::NONE`].
    pub const fn table_index(&self) -> usize {
        debug_assert!(self.is_some());
        let kind = (self.0 & Self::KIND_MASK) as usize - 1;
        if self.is_color(Color::Black) {
            kind + 6
        } else {
            kind
        }
    }

    /// Creates a new [`Piece`] from its FEN symbol.
    ///
    /// # Example
    /// ```
    /// # use corvid_core::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::from_symbol('Q').unwrap(), Piece::new(Color::White, PieceKind::Queen));
    /// assert!(Piece::from_symbol('x').is_err());
    /// ```
    pub fn from_symbol(symbol: char) -> Result<Self> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let kind = match symbol.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => bail!("invalid piece symbol {symbol:?}"),
        };

        Ok(Self::new(color, kind))
    }

    /// The FEN symbol of this piece: uppercase for White, lowercase for Black,
    /// `.` for an empty square.
    pub const fn symbol(&self) -> char {
        let symbol = match self.kind() {
            Some(PieceKind::Pawn) => 'p',
            Some(PieceKind::Knight) => 'n',
            Some(PieceKind::Bishop) => 'b',
            Some(PieceKind::Rook) => 'r',
            Some(PieceKind::Queen) => 'q',
            Some(PieceKind::King) => 'k',
            None => return '.',
        };

        if self.is_color(Color::White) {
            symbol.to_ascii_uppercase()
        } else {
            symbol
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self.symbol())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for symbol in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_symbol(symbol).unwrap();
            assert_eq!(piece.symbol(), symbol);
            assert!(piece.is_some());
        }
    }

    #[test]
    fn test_encoding_fields() {
        let rook = Piece::new(Color::Black, PieceKind::Rook);
        assert_eq!(rook.kind(), Some(PieceKind::Rook));
        assert_eq!(rook.color(), Some(Color::Black));
        assert!(rook.is_kind(PieceKind::Rook));
        assert!(rook.is_color(Color::Black));
        assert!(!rook.is_color(Color::White));

        assert_eq!(Piece::NONE.kind(), None);
        assert_eq!(Piece::NONE.color(), None);
        assert!(!Piece::NONE.is_color(Color::White));
        assert!(!Piece::NONE.is_color(Color::Black));
    }

    #[test]
    fn test_table_index() {
        assert_eq!(Piece::new(Color::White, PieceKind::Pawn).table_index(), 0);
        assert_eq!(Piece::new(Color::White, PieceKind::King).table_index(), 5);
        assert_eq!(Piece::new(Color::Black, PieceKind::Pawn).table_index(), 6);
        assert_eq!(Piece::new(Color::Black, PieceKind::King).table_index(), 11);
    }
}
