use corvid_core::Move;

use crate::config::{Score, MATE_THRESHOLD};

/// How a stored score relates to the search window that produced it.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Default)]
pub enum NodeType {
    /// The score is exact.
    #[default]
    Exact,

    /// The score is at most this (an upper bound; the node failed low).
    Upper,

    /// The score is at least this (a lower bound; the node failed high).
    Lower,
}

/// One slot of the transposition table.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TTableEntry {
    pub key: u64,
    pub bestmove: Move,
    pub score: Score,
    pub depth: u32,
    pub flag: NodeType,
}

/// A fixed-size transposition table indexed by `key % len`.
///
/// Replacement favors fresh positions and deeper searches: a slot holding a
/// different position is always overwritten, while the same position is only
/// overwritten by a search of at least the stored depth.
#[derive(Debug)]
pub struct TTable(Vec<Option<TTableEntry>>);

impl TTable {
    /// Create a new [`TTable`] that is `size` bytes.
    ///
    /// Its capacity will be `size / size_of::<TTableEntry>()`, at least one
    /// slot.
    pub fn new(size: usize) -> Self {
        Self::from_capacity(size / std::mem::size_of::<TTableEntry>())
    }

    /// Create a new [`TTable`] that can hold `capacity` entries.
    pub fn from_capacity(capacity: usize) -> Self {
        Self(vec![None; capacity.max(1)])
    }

    /// Clears the entries of this [`TTable`].
    pub fn clear(&mut self) {
        self.0.iter_mut().for_each(|entry| *entry = None);
    }

    /// Returns the size of this [`TTable`], in bytes.
    pub fn size(&self) -> usize {
        self.0.len() * std::mem::size_of::<TTableEntry>()
    }

    /// Map `key` to an index into this [`TTable`].
    fn index(&self, key: u64) -> usize {
        key as usize % self.0.len()
    }

    /// Get the entry for `key`, if and only if it was stored for `key`.
    pub fn get(&self, key: u64) -> Option<&TTableEntry> {
        let entry = self.0[self.index(key)].as_ref();
        entry.filter(|entry| entry.key == key)
    }

    /// Store `entry` under its key, subject to the replacement policy: a
    /// differing stored key always loses its slot, while an entry for the
    /// same position survives unless the new entry searched at least as deep.
    pub fn store(&mut self, entry: TTableEntry) {
        let index = self.index(entry.key);
        match &self.0[index] {
            Some(existing) if existing.key == entry.key && entry.depth < existing.depth => {}
            _ => self.0[index] = Some(entry),
        }
    }
}

/// Offsets a mate score by the ply it was found at, so the table stores the
/// distance from this node rather than from the root.
pub const fn score_to_tt(score: Score, ply: usize) -> Score {
    if score > MATE_THRESHOLD {
        score + ply as Score
    } else if score < -MATE_THRESHOLD {
        score - ply as Score
    } else {
        score
    }
}

/// Reverses [`score_to_tt`] when probing from a (possibly different) ply.
pub const fn score_from_tt(score: Score, ply: usize) -> Score {
    if score > MATE_THRESHOLD {
        score - ply as Score
    } else if score < -MATE_THRESHOLD {
        score + ply as Score
    } else {
        score
    }
}
