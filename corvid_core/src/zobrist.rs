use super::prng::XoShiRo;
use super::{Piece, NUM_PIECES, NUM_TILES};

/// Number of possible castling-rights masks.
pub const NUM_CASTLING_MASKS: usize = 16;

/// Stores the Zobrist keys used to hash board positions.
///
/// Built at compile time from a fixed seed, so every build and every engine
/// instance derives identical keys. Identical keys are what make one
/// instance's transposition entries meaningful to another.
pub const ZOBRIST: ZobristTable = ZobristTable::new();

/// Encapsulates the key material for Zobrist hashing.
///
/// A position's hash is the XOR of one key per occupied square, one key for
/// the castling-rights mask, one key for the en-passant target (a dedicated
/// 65th slot stands in when there is none), and a side key folded in only
/// when Black is to move.
pub struct ZobristTable {
    /// One key for every `(piece, tile)` pair.
    piece_keys: [[u64; NUM_TILES]; NUM_PIECES],
    /// One key per en-passant target square, plus slot 64 for "no target".
    ep_keys: [u64; NUM_TILES + 1],
    /// One key per castling-rights mask.
    castling_keys: [u64; NUM_CASTLING_MASKS],
    /// Folded in when the side to move is Black.
    side_key: u64,
}

impl ZobristTable {
    /// Initialize this table, generating keys via the [`XoShiRo`] struct.
    pub const fn new() -> Self {
        let mut piece_keys = [[0; NUM_TILES]; NUM_PIECES];
        let mut ep_keys = [0; NUM_TILES + 1];
        let mut castling_keys = [0; NUM_CASTLING_MASKS];

        let mut prng = XoShiRo::new();

        let mut piece = 0;
        while piece < NUM_PIECES {
            let mut tile = 0;
            while tile < NUM_TILES {
                let key;
                (key, prng) = prng.const_next();
                piece_keys[piece][tile] = key;
                tile += 1;
            }
            piece += 1;
        }

        let mut i = 0;
        while i < NUM_TILES + 1 {
            let key;
            (key, prng) = prng.const_next();
            ep_keys[i] = key;
            i += 1;
        }

        i = 0;
        while i < NUM_CASTLING_MASKS {
            let key;
            (key, prng) = prng.const_next();
            castling_keys[i] = key;
            i += 1;
        }

        let (side_key, _) = prng.const_next();

        Self {
            piece_keys,
            ep_keys,
            castling_keys,
            side_key,
        }
    }

    /// The key for `piece` standing on the square `index`.
    ///
    /// Must not be called with [`Piece::NONE`].
    pub const fn piece(&self, piece: Piece, index: usize) -> u64 {
        self.piece_keys[piece.table_index()][index]
    }

    /// The key for the current en-passant target, or the "no target" slot.
    pub const fn en_passant(&self, ep_index: Option<u8>) -> u64 {
        match ep_index {
            Some(index) => self.ep_keys[index as usize],
            None => self.ep_keys[NUM_TILES],
        }
    }

    /// The key for a castling-rights mask.
    pub const fn castling(&self, rights: u8) -> u64 {
        self.castling_keys[rights as usize]
    }

    /// The side-to-move key.
    pub const fn side(&self) -> u64 {
        self.side_key
    }
}
