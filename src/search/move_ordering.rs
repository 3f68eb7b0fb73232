//! Cheap move-ordering heuristic.
//!
//! Captures come first, weighted by the victim (queens and rooks get an
//! extra push), then moves toward the center, then minor pieces leaving
//! their back rank. Ordering only changes how early alpha-beta can cut.

use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::piece_value;

const QUEEN_CAPTURE_BONUS: i32 = 500;
const ROOK_CAPTURE_BONUS: i32 = 200;
const CENTER_WEIGHT: i32 = 5;
const DEVELOPMENT_BONUS: i32 = 30;

pub fn score_move(mover: Color, mv: &Move) -> i32 {
    let mut score = 0;

    if let Some(victim) = mv.captured {
        score += piece_value(victim);
        score += match victim {
            PieceKind::Queen => QUEEN_CAPTURE_BONUS,
            PieceKind::Rook => ROOK_CAPTURE_BONUS,
            _ => 0,
        };
    }

    if let Some(promo) = mv.promotion {
        score += piece_value(promo);
    }

    // Manhattan distance from the board's center point, doubled to stay
    // integral: 2 on the four central squares, 14 in the corners.
    let file = i32::from(file_of(mv.to));
    let rank = i32::from(rank_of(mv.to));
    let doubled_distance = (7 - 2 * rank).abs() + (7 - 2 * file).abs();
    score += (14 - doubled_distance) * CENTER_WEIGHT / 2;

    if mv.piece.is_minor() && rank_of(mv.from) == mover.back_rank() {
        score += DEVELOPMENT_BONUS;
    }

    score
}

/// Sort best-first. The sort is stable, so equal scores keep generation
/// order and the result is deterministic.
pub fn order_moves(mover: Color, moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| std::cmp::Reverse(score_move(mover, mv)));
}
