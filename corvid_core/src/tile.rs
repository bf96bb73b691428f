use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

/// Number of tiles on a chess board.
pub const NUM_TILES: usize = 64;

/// A board coordinate as a `(file, rank)` pair.
///
/// On-board tiles have both components in `0..8` and biject with the square
/// index `rank * 8 + file` (`a1 = 0`, `h8 = 63`). Off-board tiles are
/// representable so that ray-walking can step past an edge and be rejected by
/// [`Tile::is_valid`].
///
/// # Example
/// ```
/// # use corvid_core::Tile;
/// let e4 = Tile::from_uci("e4").unwrap();
/// assert_eq!(e4, Tile::new(4, 3));
/// assert_eq!(e4.index(), 28);
/// assert!(!e4.offset(4, 0).is_valid());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    file: i8,
    rank: i8,
}

impl Tile {
    /// Creates a new [`Tile`], which may lie off the board.
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Creates a new [`Tile`] from a square index in `0..64`.
    pub const fn from_index(index: usize) -> Self {
        Self {
            file: (index % 8) as i8,
            rank: (index / 8) as i8,
        }
    }

    /// The file component: `0..8` for `a..h` when on the board.
    pub const fn file(&self) -> i8 {
        self.file
    }

    /// The rank component: `0..8` for `1..8` when on the board.
    pub const fn rank(&self) -> i8 {
        self.rank
    }

    /// Returns `true` if this tile lies on the board.
    pub const fn is_valid(&self) -> bool {
        self.file >= 0 && self.file < 8 && self.rank >= 0 && self.rank < 8
    }

    /// The square index `rank * 8 + file`.
    ///
    /// Must only be called on a valid tile.
    pub const fn index(&self) -> usize {
        debug_assert!(self.is_valid());
        (self.rank * 8 + self.file) as usize
    }

    /// This tile displaced by `file_delta` files and `rank_delta` ranks.
    ///
    /// The result may lie off the board; check with [`Tile::is_valid`].
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Self {
        Self {
            file: self.file + file_delta,
            rank: self.rank + rank_delta,
        }
    }

    /// Creates a new [`Tile`] from algebraic notation like `e4`.
    pub fn from_uci(uci: &str) -> Result<Self> {
        let mut chars = uci.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("tile must be two characters, got {uci:?}");
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            bail!("invalid tile {uci:?}");
        }

        Ok(Self::new(file as i8 - b'a' as i8, rank as i8 - b'1' as i8))
    }

    /// This tile in algebraic notation.
    ///
    /// Must only be called on a valid tile.
    pub fn to_uci(self) -> String {
        format!(
            "{}{}",
            (b'a' + self.file as u8) as char,
            (b'1' + self.rank as u8) as char
        )
    }
}

impl FromStr for Tile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.to_uci())
        } else {
            write!(f, "Tile({}, {})", self.file, self.rank)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_index_bijection() {
        for index in 0..NUM_TILES {
            let tile = Tile::from_index(index);
            assert!(tile.is_valid());
            assert_eq!(tile.index(), index);
        }
    }

    #[test]
    fn test_uci_round_trip() {
        assert_eq!(Tile::from_uci("a1").unwrap(), Tile::new(0, 0));
        assert_eq!(Tile::from_uci("h8").unwrap(), Tile::new(7, 7));

        for index in 0..NUM_TILES {
            let tile = Tile::from_index(index);
            assert_eq!(Tile::from_uci(&tile.to_uci()).unwrap(), tile);
        }

        assert!(Tile::from_uci("i1").is_err());
        assert!(Tile::from_uci("a9").is_err());
        assert!(Tile::from_uci("e44").is_err());
    }

    #[test]
    fn test_offset_off_board() {
        let a1 = Tile::new(0, 0);
        assert!(!a1.offset(-1, 0).is_valid());
        assert!(!a1.offset(0, -1).is_valid());
        assert!(a1.offset(7, 7).is_valid());
    }
}
