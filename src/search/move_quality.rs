//! Move-quality feedback for the player.
//!
//! A move is graded from the change in static evaluation it causes, seen from
//! the mover's side, plus a small bonus for captures, checks, castling and
//! promotions. The result is a 0..=100 score and a coarse rating. This is a
//! display heuristic and carries no weight in search.

use std::fmt;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{piece_value, BoardScorer};

const CHECK_BONUS: i32 = 30;
const CASTLING_BONUS: i32 = 20;
const PROMOTION_BONUS: i32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Capture,
    Promotion,
    Castling,
    Check,
    Quiet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityRating {
    Poor,
    Questionable,
    Okay,
    Good,
    Excellent,
}

impl QualityRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => QualityRating::Excellent,
            75..=89 => QualityRating::Good,
            55..=74 => QualityRating::Okay,
            30..=54 => QualityRating::Questionable,
            _ => QualityRating::Poor,
        }
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            QualityRating::Excellent => "excellent",
            QualityRating::Good => "good",
            QualityRating::Okay => "okay",
            QualityRating::Questionable => "questionable",
            QualityRating::Poor => "poor",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveQuality {
    pub score: u8,
    pub rating: QualityRating,
    pub kind: MoveKind,
    /// Evaluations in centipawns, both from the mover's side.
    pub eval_before: i32,
    pub eval_after: i32,
    /// `eval_after - eval_before` plus the move-kind bonus.
    pub adjusted_change: i32,
}

/// Grade `mv`, which must be legal in `position`. The position is left as
/// it was.
pub fn assess_move<S: BoardScorer + ?Sized>(
    position: &mut Position,
    mv: Move,
    scorer: &S,
) -> MoveQuality {
    let mover = position.side_to_move;
    let eval_before = scorer.score(position);

    let (eval_after, gives_check) = {
        let after = position.scoped_move(mv);
        (
            -scorer.score(&after),
            is_king_in_check(&after, mover.opposite()),
        )
    };

    let kind = classify_move(&mv, gives_check);
    let bonus = match kind {
        MoveKind::Capture => mv.captured.map_or(0, piece_value) / 10,
        MoveKind::Promotion => PROMOTION_BONUS,
        MoveKind::Castling => CASTLING_BONUS,
        MoveKind::Check => CHECK_BONUS,
        MoveKind::Quiet => 0,
    };
    let adjusted_change = eval_after - eval_before + bonus;
    let score = quality_score(adjusted_change);

    MoveQuality {
        score,
        rating: QualityRating::from_score(score),
        kind,
        eval_before,
        eval_after,
        adjusted_change,
    }
}

fn classify_move(mv: &Move, gives_check: bool) -> MoveKind {
    if mv.is_capture() {
        MoveKind::Capture
    } else if mv.is_promotion() {
        MoveKind::Promotion
    } else if mv.is_castle() {
        MoveKind::Castling
    } else if gives_check {
        MoveKind::Check
    } else {
        MoveKind::Quiet
    }
}

/// Piecewise map from a centipawn change to 0..=100, steep around zero and
/// flattening toward both ends.
fn quality_score(change: i32) -> u8 {
    let quality = if change >= 80 {
        (85 + change * 15 / 100).min(98)
    } else if change >= 40 {
        (70 + change / 4).min(90)
    } else if change >= 10 {
        (60 + change / 2).min(80)
    } else if change >= -10 {
        50 + change
    } else if change >= -40 {
        (35 + change / 2).max(20)
    } else {
        (20 + change / 4).max(5)
    };
    quality.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::board_scoring::{MaterialScorer, TutorScorer};
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn assess(fen: &str, text: &str) -> MoveQuality {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let mv = parse_long_algebraic(text, &position).expect("move should be legal");
        let before = position.clone();
        let quality = assess_move(&mut position, mv, &MaterialScorer);
        assert_eq!(position, before);
        quality
    }

    #[test]
    fn winning_the_queen_is_excellent() {
        let quality = assess("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1", "f1e2");
        assert_eq!(quality.kind, MoveKind::Capture);
        assert_eq!(quality.adjusted_change, 900 + 90);
        assert_eq!(quality.score, 98);
        assert_eq!(quality.rating, QualityRating::Excellent);
    }

    #[test]
    fn large_losses_bottom_out() {
        assert_eq!(quality_score(-500), 5);
        assert_eq!(QualityRating::from_score(quality_score(-500)), QualityRating::Poor);
        assert_eq!(quality_score(-25), 23);
    }

    #[test]
    fn quiet_neutral_move_is_middling() {
        let quality = assess("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a2");
        assert_eq!(quality.kind, MoveKind::Quiet);
        assert_eq!(quality.adjusted_change, 0);
        assert_eq!(quality.score, 50);
        assert_eq!(quality.rating, QualityRating::Questionable);
    }

    #[test]
    fn castling_and_checks_are_labelled() {
        let castle = assess("4k3/8/8/8/8/8/8/4K2R w K - 0 1", "e1g1");
        assert_eq!(castle.kind, MoveKind::Castling);
        let check = assess("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a8");
        assert_eq!(check.kind, MoveKind::Check);
        assert_eq!(check.adjusted_change, CHECK_BONUS);
    }

    #[test]
    fn score_map_is_monotone_and_bounded() {
        let mut last = 0;
        for change in -2000..=2000 {
            let score = quality_score(change);
            assert!(score >= last, "dropped at {change}");
            assert!(score <= 100);
            last = score;
        }
        assert_eq!(QualityRating::from_score(90), QualityRating::Excellent);
        assert_eq!(QualityRating::from_score(29), QualityRating::Poor);
    }

    #[test]
    fn developing_a_knight_rates_above_a_rim_move() {
        let scorer = TutorScorer::default();
        let mut position = Position::new_game();
        let good = parse_long_algebraic("g1f3", &position).expect("legal");
        let rim = parse_long_algebraic("g1h3", &position).expect("legal");
        let good = assess_move(&mut position, good, &scorer);
        let rim = assess_move(&mut position, rim, &scorer);
        assert!(good.score > rim.score);
    }
}
