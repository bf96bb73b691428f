/// Wrapper over `i32` for scoring positions.
pub type Score = i32;

/// Larger than any score the search can produce.
pub const INF: Score = 1_000_000_000;

/// Score for delivering checkmate; actual mate scores are offset by the
/// distance to the mate in plies.
pub const MATE: Score = 9_000_000;

/// Scores with absolute value above this carry a mate distance rather than
/// an evaluation.
pub const MATE_THRESHOLD: Score = MATE - 100;

/// Iterative-deepening depth limit when `go depth` is not given.
pub const MAX_DEPTH: u32 = 64;

/// Hard ceiling on recursion depth, guarding against extension explosions.
pub const MAX_PLY: usize = 100;

/// Plies for which killer moves are tracked.
pub const MAX_KILLER_PLY: usize = 64;

/// The stop condition is polled once per this many nodes.
pub const NODE_POLL_INTERVAL: u64 = 512;

/// Think time when `go` carries no time information at all, in milliseconds.
pub const DEFAULT_THINK_MS: u64 = 5_000;

/// Moves-to-go assumed when the GUI sends a clock but no `movestogo`.
pub const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Default size of the transposition table, in bytes (512 MiB).
pub const DEFAULT_TT_SIZE: usize = 512 * 1024 * 1024;
