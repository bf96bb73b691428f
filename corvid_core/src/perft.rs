use crate::movegen::generate_legal;
use crate::{Board, Move, MoveList};

/// Counts the legal leaf positions reachable in exactly `depth` plies.
///
/// The standard validation for a move generator: the counts for well-known
/// positions are published, and any generation or make/undo defect shows up
/// as a mismatch. Uses bulk counting at the horizon, since recursing once
/// more just to return 1 per move measures nothing.
pub fn perft(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_legal(board, &mut moves);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board.make_move(mv);
        nodes += perft(board, depth - 1);
        board.undo_move();
    }

    nodes
}

/// Like [`perft`], but returns the node count below each root move.
///
/// Useful for diffing against another engine when a total disagrees.
pub fn perft_split(board: &mut Board, depth: usize) -> Vec<(Move, u64)> {
    let mut moves = MoveList::new();
    generate_legal(board, &mut moves);

    let mut counts = Vec::with_capacity(moves.len());
    for mv in moves {
        board.make_move(mv);
        counts.push((mv, perft(board, depth.saturating_sub(1))));
        board.undo_move();
    }

    counts
}
