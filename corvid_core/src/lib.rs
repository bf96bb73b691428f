/// The board grid, game state, and make/undo with incremental hashing.
pub mod board;

/// Attack detection and pseudo-legal move generation.
pub mod movegen;

/// The move record and bounded move buffer.
pub mod moves;

/// Leaf-node counting for move generator validation.
pub mod perft;

/// Piece encoding: one byte holding color and kind.
pub mod piece;

/// The deterministic generator behind the Zobrist keys.
pub mod prng;

/// Board coordinates and algebraic notation.
pub mod tile;

/// Position hashing keys.
pub mod zobrist;

pub use board::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use tile::*;
pub use zobrist::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::board::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use crate::piece::*;
    pub use crate::tile::*;
    pub use crate::zobrist::*;
}
