use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::{Board, Color, Move, MoveList, Piece, PieceKind, Tile, NUM_TILES};

/// The eight knight jumps as `(file, rank)` deltas.
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-1, -2),
    (1, -2),
    (-2, -1),
    (2, -1),
    (-2, 1),
    (2, 1),
    (-1, 2),
    (1, 2),
];

/// The four diagonal ray directions.
pub const BISHOP_DELTAS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// The four orthogonal ray directions.
pub const ROOK_DELTAS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// The eight adjacent-square directions.
pub const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// All eight ray directions, for queens.
pub const QUEEN_DELTAS: [(i8, i8); 8] = KING_DELTAS;

/// Returns `true` if any piece of `by` attacks `tile`.
///
/// Checks the five attacker categories in turn: knight jumps, pawn diagonals
/// pointing into `tile`, orthogonal rays (rook/queen), diagonal rays
/// (bishop/queen), and an adjacent king. A pure function of the square grid.
pub fn is_square_attacked(board: &Board, tile: Tile, by: Color) -> bool {
    for (df, dr) in KNIGHT_DELTAS {
        let target = tile.offset(df, dr);
        if target.is_valid() && board.piece_at(target).is(by, PieceKind::Knight) {
            return true;
        }
    }

    // An attacking pawn sits one rank closer to its home side than `tile`.
    let pawn_rank = -by.pawn_direction();
    for df in [-1, 1] {
        let target = tile.offset(df, pawn_rank);
        if target.is_valid() && board.piece_at(target).is(by, PieceKind::Pawn) {
            return true;
        }
    }

    for (df, dr) in ROOK_DELTAS {
        let mut target = tile.offset(df, dr);
        while target.is_valid() {
            let piece = board.piece_at(target);
            if piece.is_some() {
                if piece.is_color(by)
                    && (piece.is_kind(PieceKind::Rook) || piece.is_kind(PieceKind::Queen))
                {
                    return true;
                }
                break;
            }
            target = target.offset(df, dr);
        }
    }

    for (df, dr) in BISHOP_DELTAS {
        let mut target = tile.offset(df, dr);
        while target.is_valid() {
            let piece = board.piece_at(target);
            if piece.is_some() {
                if piece.is_color(by)
                    && (piece.is_kind(PieceKind::Bishop) || piece.is_kind(PieceKind::Queen))
                {
                    return true;
                }
                break;
            }
            target = target.offset(df, dr);
        }
    }

    for (df, dr) in KING_DELTAS {
        let target = tile.offset(df, dr);
        if target.is_valid() && board.piece_at(target).is(by, PieceKind::King) {
            return true;
        }
    }

    false
}

/// Returns `true` if the side that just moved did not leave its own king
/// attacked.
///
/// Meant to be called right after [`Board::make_move`]: the side to move has
/// already flipped, so the king under test belongs to its opponent.
pub fn is_legal_position(board: &Board) -> bool {
    let mover = board.active_color().opponent();
    !is_square_attacked(board, board.king(mover), board.active_color())
}

/// Generates all pseudo-legal moves for the side to move into `moves`.
///
/// Pseudo-legal means the move obeys piece movement but may leave the mover's
/// own king attacked; the caller filters by applying the move and testing
/// [`is_legal_position`]. Castling is the exception and is generated fully
/// legal, since its path-safety rules don't fit the apply-and-test scheme.
pub fn generate_pseudo_legal(board: &Board, moves: &mut MoveList) {
    for index in 0..NUM_TILES {
        let piece = board.piece_at(Tile::from_index(index));
        if !piece.is_color(board.active_color()) {
            continue;
        }

        let from = Tile::from_index(index);
        match piece.kind() {
            Some(PieceKind::Pawn) => pawn_moves(board, from, piece, moves),
            Some(PieceKind::Knight) => leaper_moves(board, from, piece, &KNIGHT_DELTAS, moves),
            Some(PieceKind::Bishop) => slider_moves(board, from, piece, &BISHOP_DELTAS, moves),
            Some(PieceKind::Rook) => slider_moves(board, from, piece, &ROOK_DELTAS, moves),
            Some(PieceKind::Queen) => slider_moves(board, from, piece, &QUEEN_DELTAS, moves),
            Some(PieceKind::King) => king_moves(board, from, piece, moves),
            None => {}
        }
    }
}

/// Generates all fully legal moves for the side to move into `moves`.
///
/// Filters the pseudo-legal set by applying each move and testing the mover's
/// king. Used where the complete legal set is needed up front: the search
/// root, perft, protocol move validation, and PV verification.
pub fn generate_legal(board: &mut Board, moves: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(board, &mut pseudo);

    for mv in pseudo {
        board.make_move(mv);
        if is_legal_position(board) {
            moves.push(mv);
        }
        board.undo_move();
    }
}

/// Emits `mv`, fanning out into the four promotion variants when a pawn
/// reaches the last rank.
fn push_pawn_move(mv: Move, color: Color, moves: &mut MoveList) {
    if mv.to.rank() == 7 || mv.to.rank() == 0 {
        for kind in [
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
        ] {
            moves.push(mv.promoting_to(Piece::new(color, kind)));
        }
    } else {
        moves.push(mv);
    }
}

fn pawn_moves(board: &Board, from: Tile, piece: Piece, moves: &mut MoveList) {
    let color = board.active_color();
    let dir = color.pawn_direction();
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };

    let forward = from.offset(0, dir);
    let forward_empty = forward.is_valid() && board.piece_at(forward).is_none();
    if forward_empty {
        push_pawn_move(Move::quiet(from, forward, piece), color, moves);

        let double = forward.offset(0, dir);
        if from.rank() == start_rank && double.is_valid() && board.piece_at(double).is_none() {
            moves.push(Move::quiet(from, double, piece));
        }
    }

    for df in [-1, 1] {
        let target = from.offset(df, dir);
        if !target.is_valid() {
            continue;
        }

        let victim = board.piece_at(target);
        if victim.is_some() && !victim.is_color(color) {
            push_pawn_move(Move::capture(from, target, piece, victim), color, moves);
        } else if board.ep_index() == Some(target.index() as u8) {
            // The victim pawn stands beside us, on the target's file.
            let beside = Tile::new(target.file(), from.rank());
            let victim = board.piece_at(beside);
            if victim.is_kind(PieceKind::Pawn) && !victim.is_color(color) {
                moves.push(Move::capture(from, target, piece, victim));
            }
        }
    }
}

fn leaper_moves(
    board: &Board,
    from: Tile,
    piece: Piece,
    deltas: &[(i8, i8)],
    moves: &mut MoveList,
) {
    let color = board.active_color();
    for &(df, dr) in deltas {
        let target = from.offset(df, dr);
        if !target.is_valid() {
            continue;
        }

        let occupant = board.piece_at(target);
        if occupant.is_none() {
            moves.push(Move::quiet(from, target, piece));
        } else if !occupant.is_color(color) {
            moves.push(Move::capture(from, target, piece, occupant));
        }
    }
}

fn slider_moves(
    board: &Board,
    from: Tile,
    piece: Piece,
    deltas: &[(i8, i8)],
    moves: &mut MoveList,
) {
    let color = board.active_color();
    for &(df, dr) in deltas {
        let mut target = from.offset(df, dr);
        while target.is_valid() {
            let occupant = board.piece_at(target);
            if occupant.is_none() {
                moves.push(Move::quiet(from, target, piece));
            } else {
                if !occupant.is_color(color) {
                    moves.push(Move::capture(from, target, piece, occupant));
                }
                break;
            }
            target = target.offset(df, dr);
        }
    }
}

fn king_moves(board: &Board, from: Tile, piece: Piece, moves: &mut MoveList) {
    leaper_moves(board, from, piece, &KING_DELTAS, moves);

    let color = board.active_color();
    let enemy = color.opponent();
    let (kingside, queenside) = match color {
        Color::White => (CASTLE_WK, CASTLE_WQ),
        Color::Black => (CASTLE_BK, CASTLE_BQ),
    };

    if board.castling_rights() & (kingside | queenside) == 0 {
        return;
    }

    // Castling out of check is never legal.
    if is_square_attacked(board, from, enemy) {
        return;
    }

    if board.castling_rights() & kingside != 0 {
        let crossed = from.offset(1, 0);
        let landing = from.offset(2, 0);
        if landing.is_valid()
            && board.piece_at(crossed).is_none()
            && board.piece_at(landing).is_none()
            && !is_square_attacked(board, crossed, enemy)
            && !is_square_attacked(board, landing, enemy)
        {
            moves.push(Move::quiet(from, landing, piece));
        }
    }

    if board.castling_rights() & queenside != 0 {
        let crossed = from.offset(-1, 0);
        let landing = from.offset(-2, 0);
        // The knight square must be empty, but only the rook crosses it, so
        // it needs no attack check.
        let rook_path = from.offset(-3, 0);
        if rook_path.is_valid()
            && board.piece_at(crossed).is_none()
            && board.piece_at(landing).is_none()
            && board.piece_at(rook_path).is_none()
            && !is_square_attacked(board, crossed, enemy)
            && !is_square_attacked(board, landing, enemy)
        {
            moves.push(Move::quiet(from, landing, piece));
        }
    }
}
