use std::time::{Duration, Instant};

use anyhow::{bail, Result};

use corvid_core::{
    generate_legal, generate_pseudo_legal, is_legal_position, is_square_attacked, Board, Move,
    MoveList,
};

use super::transposition_table::{score_from_tt, score_to_tt, NodeType, TTable, TTableEntry};
use crate::config::{
    Score, DEFAULT_TT_SIZE, INF, MATE, MATE_THRESHOLD, MAX_DEPTH, MAX_KILLER_PLY, MAX_PLY,
    NODE_POLL_INTERVAL,
};
use crate::eval::{evaluate, value_of};

/// Bounds for one search: a time budget, a depth budget, or both.
///
/// With neither, the search runs to the built-in depth limit (or until the
/// stop predicate fires).
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    pub time: Option<Duration>,
    pub depth: Option<u32>,
}

/// Progress emitted once per completed iterative-deepening depth.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub depth: u32,
    /// From the side-to-move's perspective; mate scores are offset from [`MATE`].
    pub score: Score,
    pub nodes: u64,
    pub elapsed: Duration,
    /// The principal variation, starting with the best move.
    pub pv: Vec<Move>,
}

/// The final result of a search.
#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    /// The best move from the deepest completed depth, or the null move if
    /// no depth completed or the position has no legal moves.
    pub bestmove: Move,
    pub score: Score,
    /// The deepest fully completed depth.
    pub depth: u32,
}

/// Owns a board and a transposition table, and searches for best moves.
///
/// The board is the single source of truth for the position: the protocol
/// layer loads it through [`Searcher::set_fen`] / [`Searcher::apply_uci_move`]
/// and the search mutates it only in make/undo pairs, so it is unchanged
/// whenever a call returns, stopped or not.
///
/// The transposition table survives across searches; killer tables are
/// cleared at the start of each one.
pub struct Searcher {
    board: Board,
    ttable: TTable,
    killers: [[Move; 2]; MAX_KILLER_PLY],
    nodes: u64,
    stop: bool,
    started: Instant,
    time_limit: Option<Duration>,
}

impl Searcher {
    /// Creates a searcher with the default transposition table size.
    pub fn new() -> Self {
        Self::with_tt_size(DEFAULT_TT_SIZE)
    }

    /// Creates a searcher whose transposition table is `tt_size` bytes.
    pub fn with_tt_size(tt_size: usize) -> Self {
        Self {
            board: Board::new(),
            ttable: TTable::new(tt_size),
            killers: [[Move::null(); 2]; MAX_KILLER_PLY],
            nodes: 0,
            stop: false,
            started: Instant::now(),
            time_limit: None,
        }
    }

    /// The current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Loads a position from FEN. Best-effort, like [`Board::set_fen`].
    pub fn set_fen(&mut self, fen: &str) {
        self.board.set_fen(fen);
    }

    /// Applies a protocol move string (`e2e4`, `e7e8q`) to the position.
    ///
    /// The string is matched against the generated legal move set; anything
    /// else is rejected, so an illegal or garbled move can never corrupt the
    /// board.
    pub fn apply_uci_move(&mut self, uci: &str) -> Result<()> {
        let mut moves = MoveList::new();
        generate_legal(&mut self.board, &mut moves);

        match moves.iter().find(|mv| mv.to_uci() == uci) {
            Some(&mv) => {
                self.board.make_move(mv);
                Ok(())
            }
            None => bail!("illegal move {uci:?} in position {}", self.board.to_fen()),
        }
    }

    /// Searches the current position within `limits`, reporting each
    /// completed depth through `on_report`.
    ///
    /// `should_stop` is polled cooperatively during the search (every
    /// [`NODE_POLL_INTERVAL`] nodes); when it returns `true`, or the time
    /// budget runs out, the search unwinds and the result of the last
    /// *completed* depth is returned.
    pub fn get_best_move(
        &mut self,
        limits: SearchLimits,
        should_stop: &mut dyn FnMut() -> bool,
        mut on_report: impl FnMut(&SearchReport),
    ) -> SearchOutcome {
        self.nodes = 0;
        self.stop = false;
        self.killers = [[Move::null(); 2]; MAX_KILLER_PLY];
        self.started = Instant::now();
        self.time_limit = limits.time;

        let depth_limit = limits.depth.unwrap_or(MAX_DEPTH);

        let mut best = SearchOutcome {
            bestmove: Move::null(),
            score: 0,
            depth: 0,
        };

        for depth in 1..=depth_limit {
            self.poll_stop(should_stop);
            if self.stop {
                break;
            }

            let mut roots = MoveList::new();
            generate_legal(&mut self.board, &mut roots);

            if roots.is_empty() {
                on_report(&SearchReport {
                    depth,
                    score: 0,
                    nodes: self.nodes,
                    elapsed: self.started.elapsed(),
                    pv: Vec::new(),
                });
                break;
            }

            let tt_move = self
                .ttable
                .get(self.board.zobrist_hash())
                .map(|entry| entry.bestmove);
            self.order_moves(&mut roots, tt_move, Some(0));

            // Each depth finds its own best; only a completed depth is committed.
            let mut best_this_depth = Move::null();
            let mut best_score_this_depth = -INF;
            let mut alpha = -INF;

            for mv in roots.iter().copied() {
                self.board.make_move(mv);
                let score = -self.search(depth - 1, 1, -INF, -alpha, should_stop);
                self.board.undo_move();

                if self.stop {
                    break;
                }

                if score > best_score_this_depth {
                    best_score_this_depth = score;
                    best_this_depth = mv;
                }
                if score > alpha {
                    alpha = score;
                }
            }

            if self.stop {
                break;
            }

            best = SearchOutcome {
                bestmove: best_this_depth,
                score: best_score_this_depth,
                depth,
            };

            let pv = self.extract_pv(best_this_depth, depth);
            on_report(&SearchReport {
                depth,
                score: best_score_this_depth,
                nodes: self.nodes,
                elapsed: self.started.elapsed(),
                pv,
            });
        }

        best
    }

    /// Fail-hard negamax with a transposition table, null-move pruning, check
    /// extensions, and late-move reductions.
    fn search(
        &mut self,
        depth: u32,
        ply: usize,
        mut alpha: Score,
        mut beta: Score,
        should_stop: &mut dyn FnMut() -> bool,
    ) -> Score {
        self.nodes += 1;
        if self.nodes % NODE_POLL_INTERVAL == 0 {
            self.poll_stop(should_stop);
        }
        if self.stop {
            // Discarded by the caller once the abort unwinds to the root.
            return 0;
        }

        if ply >= MAX_PLY {
            return evaluate(&self.board);
        }

        if ply > 0 {
            if self.board.can_draw_by_fifty() {
                return 0;
            }
            if self.board.is_repetition() {
                return 0;
            }
        }

        let key = self.board.zobrist_hash();
        let mut tt_move = None;
        if let Some(entry) = self.ttable.get(key) {
            tt_move = Some(entry.bestmove);

            if entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.flag {
                    NodeType::Exact => return score,
                    NodeType::Lower => alpha = alpha.max(score),
                    NodeType::Upper => beta = beta.min(score),
                }
                if alpha >= beta {
                    return score;
                }
            }
        }

        if depth == 0 {
            return self.quiesce(alpha, beta, ply, should_stop);
        }

        let in_check = self.board.is_in_check(self.board.active_color());

        // Null-move pruning: if passing the turn still fails high on a
        // reduced search, a real move surely would. Skipped in check and
        // near mate scores, where a pass is not sound.
        if depth >= 3 && ply > 0 && beta.abs() < MATE_THRESHOLD && !in_check {
            let reduction = 2 + depth / 6;
            self.board.make_null_move();
            let score = -self.search(
                depth.saturating_sub(1 + reduction),
                ply + 1,
                -beta,
                -beta + 1,
                should_stop,
            );
            self.board.undo_null_move();

            if self.stop {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let mut moves = MoveList::new();
        generate_pseudo_legal(&self.board, &mut moves);
        self.order_moves(&mut moves, tt_move, Some(ply));

        let original_alpha = alpha;
        let mut best_move = Move::null();
        let mut legal_moves = 0;

        for (i, mv) in moves.iter().copied().enumerate() {
            self.board.make_move(mv);
            if !is_legal_position(&self.board) {
                self.board.undo_move();
                continue;
            }
            legal_moves += 1;

            // Extend checks whose checking piece is safe from immediate
            // capture.
            let opponent = self.board.active_color();
            let mut extension = 0;
            if self.board.is_in_check(opponent)
                && !is_square_attacked(&self.board, mv.to, opponent)
            {
                extension = 1;
            }

            // Late-move reduction: quiet, unexceptional moves deep in the
            // list get a shallower first look.
            let mut reduction = 0;
            if i >= 3
                && !in_check
                && extension == 0
                && !mv.is_capture()
                && !mv.is_promotion()
                && !self.is_killer(mv, ply)
            {
                reduction = 1 + depth / 4 + i as u32 / 8;
                reduction = reduction.min(depth.saturating_sub(2));
            }

            let mut score = -self.search(
                depth - 1 + extension - reduction,
                ply + 1,
                -beta,
                -alpha,
                should_stop,
            );

            // A reduced move that beats alpha earns a full-depth re-search.
            if reduction > 0 && score > alpha && !self.stop {
                score = -self.search(depth - 1 + extension, ply + 1, -beta, -alpha, should_stop);
            }

            self.board.undo_move();

            if self.stop {
                return 0;
            }

            if score >= beta {
                self.record_killer(mv, ply);
                self.ttable.store(TTableEntry {
                    key,
                    bestmove: mv,
                    score: score_to_tt(score, ply),
                    depth,
                    flag: NodeType::Lower,
                });
                return beta;
            }

            if score > alpha {
                alpha = score;
                best_move = mv;
            }
        }

        if legal_moves == 0 {
            return if in_check { -MATE + ply as Score } else { 0 };
        }

        // A fail-low node has no best move of its own; keep the one already
        // stored for this position rather than clobbering it with null.
        let bestmove = if best_move.is_null() {
            self.ttable
                .get(key)
                .map(|entry| entry.bestmove)
                .unwrap_or(best_move)
        } else {
            best_move
        };

        let flag = if alpha > original_alpha {
            NodeType::Exact
        } else {
            NodeType::Upper
        };
        self.ttable.store(TTableEntry {
            key,
            bestmove,
            score: score_to_tt(alpha, ply),
            depth,
            flag,
        });

        alpha
    }

    /// Stand-pat quiescence over captures and promotions only, resolving
    /// tactical exchanges before the static evaluation is trusted.
    fn quiesce(
        &mut self,
        mut alpha: Score,
        beta: Score,
        ply: usize,
        should_stop: &mut dyn FnMut() -> bool,
    ) -> Score {
        self.nodes += 1;
        if self.nodes % NODE_POLL_INTERVAL == 0 {
            self.poll_stop(should_stop);
        }
        if self.stop {
            return 0;
        }

        if ply >= MAX_PLY {
            return evaluate(&self.board);
        }

        let stand_pat = evaluate(&self.board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = MoveList::new();
        generate_pseudo_legal(&self.board, &mut moves);
        self.order_moves(&mut moves, None, None);

        let mut legal_moves = 0;

        for mv in moves.iter().copied() {
            self.board.make_move(mv);
            if !is_legal_position(&self.board) {
                self.board.undo_move();
                continue;
            }
            legal_moves += 1;

            if !mv.is_capture() && !mv.is_promotion() {
                self.board.undo_move();
                continue;
            }

            let score = -self.quiesce(-beta, -alpha, ply + 1, should_stop);
            self.board.undo_move();

            if self.stop {
                return 0;
            }

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        if legal_moves == 0 {
            let in_check = self.board.is_in_check(self.board.active_color());
            return if in_check { -MATE + ply as Score } else { 0 };
        }

        alpha
    }

    /// Assigns every move an ordering score and sorts descending: hash move,
    /// then captures by MVV-LVA, then promotions, then killers.
    fn order_moves(&self, moves: &mut MoveList, tt_move: Option<Move>, killer_ply: Option<usize>) {
        moves.sort_by_cached_key(|mv| -self.score_move(mv, tt_move, killer_ply));
    }

    fn score_move(&self, mv: &Move, tt_move: Option<Move>, killer_ply: Option<usize>) -> Score {
        if tt_move.is_some_and(|tt| mv.matches(&tt)) {
            return 2_000_000;
        }

        if let Some(victim) = mv.captured.kind() {
            // Most valuable victim first, least valuable attacker as the
            // tie-break.
            let attacker = mv.moved.kind().map_or(0, value_of);
            return 1_000_000 + value_of(victim) * 100 - attacker;
        }

        if let Some(promotion) = mv.promotion.kind() {
            return 1_000_000 + value_of(promotion);
        }

        if let Some(ply) = killer_ply {
            if ply < MAX_KILLER_PLY {
                if self.killers[ply][0].matches(mv) {
                    return 900_000;
                }
                if self.killers[ply][1].matches(mv) {
                    return 800_000;
                }
            }
        }

        0
    }

    /// Returns `true` if `mv` is a killer at `ply`.
    fn is_killer(&self, mv: Move, ply: usize) -> bool {
        ply < MAX_KILLER_PLY
            && (self.killers[ply][0].matches(&mv) || self.killers[ply][1].matches(&mv))
    }

    /// Remembers a quiet move that caused a beta cutoff. Captures and
    /// promotions are already ordered high and are not stored.
    fn record_killer(&mut self, mv: Move, ply: usize) {
        if ply >= MAX_KILLER_PLY || mv.is_capture() || mv.is_promotion() {
            return;
        }
        if self.killers[ply][0].matches(&mv) {
            return;
        }
        self.killers[ply][1] = self.killers[ply][0];
        self.killers[ply][0] = mv;
    }

    /// Walks the transposition table from the root to recover the principal
    /// variation behind `best`, up to `depth` plies.
    ///
    /// Stops early on a hash mismatch, a degenerate stored move, a stored
    /// move that is no longer legal, or when the side to move is in check
    /// (a stale entry is likeliest there). Undoes everything it applied.
    fn extract_pv(&mut self, best: Move, depth: u32) -> Vec<Move> {
        if best.is_null() {
            return Vec::new();
        }

        let mut pv = vec![best];
        self.board.make_move(best);
        let mut applied = 1;

        for _ in 1..depth {
            let Some(entry) = self.ttable.get(self.board.zobrist_hash()) else {
                break;
            };
            let mv = entry.bestmove;
            if mv.is_null() {
                break;
            }
            if self.board.is_in_check(self.board.active_color()) {
                break;
            }

            let mut legal = MoveList::new();
            generate_legal(&mut self.board, &mut legal);
            let Some(&mv) = legal
                .iter()
                .find(|m| m.matches(&mv) && m.promotion == mv.promotion)
            else {
                break;
            };

            pv.push(mv);
            self.board.make_move(mv);
            applied += 1;
        }

        for _ in 0..applied {
            self.board.undo_move();
        }

        pv
    }

    /// Sets the stop flag when the external predicate fires or the time
    /// budget is spent.
    fn poll_stop(&mut self, should_stop: &mut dyn FnMut() -> bool) {
        if self.stop {
            return;
        }
        if should_stop() {
            self.stop = true;
            return;
        }
        if let Some(limit) = self.time_limit {
            if self.started.elapsed() >= limit {
                self.stop = true;
            }
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// A searcher with a small table, so tests don't allocate 512 MiB each.
    fn searcher_at(fen: &str) -> Searcher {
        let mut searcher = Searcher::with_tt_size(1024 * 1024);
        searcher.set_fen(fen);
        searcher
    }

    fn search_depth(searcher: &mut Searcher, depth: u32) -> (SearchOutcome, Vec<SearchReport>) {
        let mut reports = Vec::new();
        let outcome = searcher.get_best_move(
            SearchLimits {
                time: None,
                depth: Some(depth),
            },
            &mut || false,
            |report| reports.push(report.clone()),
        );
        (outcome, reports)
    }

    #[test]
    fn test_finds_mate_in_one() {
        let mut searcher = searcher_at("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let (outcome, reports) = search_depth(&mut searcher, 5);

        assert_eq!(outcome.bestmove.to_uci(), "a1a8");
        assert_eq!(outcome.score, MATE - 1);
        assert!(!reports.is_empty());
        assert_eq!(reports.last().unwrap().pv[0].to_uci(), "a1a8");
    }

    #[test]
    fn test_fifty_move_rule_scores_zero() {
        let mut searcher = searcher_at("k7/8/8/8/8/8/8/K6R w - - 100 1");
        let (outcome, _) = search_depth(&mut searcher, 2);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_no_legal_moves_reports_null() {
        // White to move is stalemated in the corner.
        let mut searcher = searcher_at("k7/8/8/8/8/8/5q2/7K w - - 0 1");
        let (outcome, reports) = search_depth(&mut searcher, 3);

        assert!(outcome.bestmove.is_null());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].score, 0);
        assert!(reports[0].pv.is_empty());
    }

    #[test]
    fn test_board_unchanged_after_search() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut searcher = searcher_at(fen);
        let hash_before = searcher.board().zobrist_hash();

        let _ = search_depth(&mut searcher, 3);

        assert_eq!(searcher.board().to_fen(), fen);
        assert_eq!(searcher.board().zobrist_hash(), hash_before);
        assert_eq!(
            searcher.board().zobrist_hash(),
            searcher.board().calculate_hash()
        );
    }

    #[test]
    fn test_search_is_deterministic() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        let (a, _) = search_depth(&mut searcher_at(fen), 4);
        let (b, _) = search_depth(&mut searcher_at(fen), 4);
        assert_eq!(a.score, b.score);
        assert_eq!(a.bestmove, b.bestmove);
    }

    #[test]
    fn test_stop_predicate_aborts() {
        let mut searcher = searcher_at(corvid_core::FEN_STARTPOS);
        let mut polls = 0;
        let outcome = searcher.get_best_move(
            SearchLimits::default(),
            &mut || {
                polls += 1;
                polls > 2
            },
            |_| {},
        );
        // Whatever depth completed, the board survived and the result is
        // consistent.
        assert!(outcome.depth < MAX_DEPTH);
        assert_eq!(
            searcher.board().zobrist_hash(),
            searcher.board().calculate_hash()
        );
    }

    #[test]
    fn test_repetition_at_root_is_searched() {
        let mut searcher = searcher_at(corvid_core::FEN_STARTPOS);
        for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            searcher.apply_uci_move(mv).unwrap();
        }
        assert!(searcher.board().is_repetition());

        let (outcome, _) = search_depth(&mut searcher, 4);
        // The root position repeats, but the engine still has to pick a move.
        assert!(!outcome.bestmove.is_null());
        assert_eq!(outcome.depth, 4);
    }

    #[test]
    fn test_apply_uci_move_rejects_illegal() {
        let mut searcher = searcher_at(corvid_core::FEN_STARTPOS);
        assert!(searcher.apply_uci_move("e2e5").is_err());
        assert!(searcher.apply_uci_move("e7e5").is_err());
        assert!(searcher.apply_uci_move("banana").is_err());
        assert!(searcher.apply_uci_move("e2e4").is_ok());
    }

    #[test]
    fn test_mate_score_prefers_faster_mate() {
        // Mate in one must outrank mate in three.
        let mut searcher = searcher_at("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let (outcome, _) = search_depth(&mut searcher, 6);
        assert_eq!(outcome.score, MATE - 1);
    }
}
