//! Fixed-depth negamax search with alpha-beta pruning.
//!
//! The search mutates one `Position` through scoped make/unmake, so each
//! trial move is undone before its sibling is tried. Terminal nodes score
//! `-(MATE_SCORE - ply)` for the side that is mated, which makes shorter
//! mates preferable, and zero for stalemate and rule draws.
//!
//! `reference_search` is the same recursion without pruning or a root cap.
//! It exists to check that pruning never changes the root result.

use log::debug;

use crate::game_state::chess_types::*;
use crate::game_state::game_status::rule_draw;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_legal_move};
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{BoardScorer, MATE_SCORE};
use crate::search::move_ordering::order_moves;

const INFINITY: i32 = MATE_SCORE + 1;

/// Caller-side limits layered over exact minimax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchHints {
    /// Search only this many root moves, best-ordered first.
    pub root_move_cap: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the root has no legal move.
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub cutoffs: u64,
}

/// Best move for the side to move in `position`, which is left unchanged.
pub fn best_move<S: BoardScorer + ?Sized>(
    position: &mut Position,
    depth: u8,
    hints: &SearchHints,
    scorer: &S,
) -> SearchResult {
    let mut searcher = Searcher::new(scorer, true);
    let result = searcher.root(position, depth, hints.root_move_cap);
    debug!(
        "search depth {} nodes {} cutoffs {} score {} best {}",
        result.depth,
        result.nodes,
        result.cutoffs,
        result.score,
        result
            .best_move
            .map_or_else(|| "none".to_owned(), |mv| mv.to_long_algebraic())
    );
    result
}

/// Plain minimax over every legal move, no pruning and no root cap.
pub fn reference_search<S: BoardScorer + ?Sized>(
    position: &mut Position,
    depth: u8,
    scorer: &S,
) -> SearchResult {
    Searcher::new(scorer, false).root(position, depth, None)
}

struct Searcher<'a, S: BoardScorer + ?Sized> {
    scorer: &'a S,
    prune: bool,
    nodes: u64,
    cutoffs: u64,
}

impl<'a, S: BoardScorer + ?Sized> Searcher<'a, S> {
    fn new(scorer: &'a S, prune: bool) -> Self {
        Self {
            scorer,
            prune,
            nodes: 0,
            cutoffs: 0,
        }
    }

    fn root(&mut self, position: &mut Position, depth: u8, cap: Option<usize>) -> SearchResult {
        self.nodes += 1;
        let mut moves = generate_legal_moves(position);

        if moves.is_empty() || depth == 0 {
            let score = if moves.is_empty() {
                terminal_score(position, 0)
            } else {
                self.scorer.score(position)
            };
            return SearchResult {
                best_move: None,
                score,
                depth,
                nodes: self.nodes,
                cutoffs: self.cutoffs,
            };
        }

        order_moves(position.side_to_move, &mut moves);
        if let Some(cap) = cap {
            moves.truncate(cap.max(1));
        }

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_move = None;
        let mut best_score = -INFINITY;

        for mv in moves {
            let score = {
                let mut child = position.scoped_move(mv);
                -self.negamax(&mut child, depth - 1, -beta, -alpha, 1)
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if self.prune && score > alpha {
                alpha = score;
            }
        }

        SearchResult {
            best_move,
            score: best_score,
            depth,
            nodes: self.nodes,
            cutoffs: self.cutoffs,
        }
    }

    fn negamax(
        &mut self,
        position: &mut Position,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply: u8,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            // Mate and stalemate at the horizon must still dominate the
            // static score.
            if !has_legal_move(position) {
                return terminal_score(position, ply);
            }
            if rule_draw(position).is_some() {
                return 0;
            }
            return self.scorer.score(position);
        }

        let mut moves = generate_legal_moves(position);
        if moves.is_empty() {
            return terminal_score(position, ply);
        }
        if rule_draw(position).is_some() {
            return 0;
        }

        order_moves(position.side_to_move, &mut moves);

        let mut best = -INFINITY;
        for mv in moves {
            let score = {
                let mut child = position.scoped_move(mv);
                -self.negamax(&mut child, depth - 1, -beta, -alpha, ply + 1)
            };

            if score > best {
                best = score;
            }
            if !self.prune {
                continue;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }

        best
    }
}

fn terminal_score(position: &Position, ply: u8) -> i32 {
    if is_king_in_check(position, position.side_to_move) {
        -MATE_SCORE + i32::from(ply)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::board_scoring::{MaterialScorer, TutorScorer};
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn search(fen: &str, depth: u8) -> SearchResult {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        best_move(&mut position, depth, &SearchHints::default(), &MaterialScorer)
    }

    #[test]
    fn depth_zero_returns_static_score_only() {
        let result = search("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 0);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn takes_the_free_queen() {
        let result = search("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1", 1);
        let best = result.best_move.expect("a move exists");
        assert_eq!(best.to_long_algebraic(), "f1e2");
    }

    #[test]
    fn finds_mate_in_one_at_depth_one() {
        let mut position =
            Position::from_fen("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1").expect("FEN should parse");
        let result = best_move(&mut position, 1, &SearchHints::default(), &MaterialScorer);
        let best = result.best_move.expect("a move exists");
        let mut after = position.scoped_move(best);
        assert!(generate_legal_moves(&mut after).is_empty());
        assert!(result.score > MATE_SCORE - 10);
    }

    #[test]
    fn mated_root_reports_no_move() {
        let result = search("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", 3);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -MATE_SCORE);
    }

    #[test]
    fn search_leaves_the_position_untouched() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let before = position.clone();
        let _ = best_move(&mut position, 3, &SearchHints::default(), &TutorScorer::default());
        assert_eq!(position, before);
    }

    #[test]
    fn pruning_matches_the_unpruned_reference() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
        let scorer = TutorScorer::default();
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        for depth in 1..=3 {
            let pruned = best_move(&mut position, depth, &SearchHints::default(), &scorer);
            let reference = reference_search(&mut position, depth, &scorer);
            assert_eq!(pruned.score, reference.score, "depth {depth}");
            assert_eq!(pruned.best_move, reference.best_move, "depth {depth}");
            assert!(pruned.nodes <= reference.nodes);
        }
        let mate = parse_long_algebraic("h5f7", &position).expect("Qxf7 is legal");
        let deep = best_move(&mut position, 2, &SearchHints::default(), &scorer);
        assert_eq!(deep.best_move, Some(mate));
    }

    #[test]
    fn side_ahead_avoids_the_fifty_move_draw() {
        // Any rook or king move is the hundredth reversible halfmove.
        let fen = "4k3/8/8/8/8/8/P7/R3K3 w - - 99 80";
        for depth in 1..=2 {
            let result = search(fen, depth);
            let best = result.best_move.expect("a move exists");
            assert_eq!(best.piece, PieceKind::Pawn, "depth {depth}");
            assert_eq!(result.score, 600, "depth {depth}");
        }
    }

    #[test]
    fn side_behind_takes_the_repetition() {
        let mut position = Position::from_fen("4k1n1/8/8/8/8/8/7Q/4K1N1 w - - 0 1")
            .expect("FEN should parse");
        for text in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1"] {
            let mv = parse_long_algebraic(text, &position).expect("move should parse");
            position.make_move(mv);
        }
        let repeat = parse_long_algebraic("f6g8", &position).expect("knight can return");
        for depth in 1..=2 {
            let result = best_move(&mut position, depth, &SearchHints::default(), &MaterialScorer);
            assert_eq!(result.best_move, Some(repeat), "depth {depth}");
            assert_eq!(result.score, 0, "depth {depth}");
        }
    }

    #[test]
    fn root_cap_limits_the_candidates() {
        let mut position = Position::new_game();
        let hints = SearchHints {
            root_move_cap: Some(3),
        };
        let capped = best_move(&mut position, 1, &hints, &MaterialScorer);
        let full = best_move(&mut position, 1, &SearchHints::default(), &MaterialScorer);
        assert!(capped.nodes < full.nodes);
        assert_eq!(capped.nodes, 1 + 3);
    }
}
