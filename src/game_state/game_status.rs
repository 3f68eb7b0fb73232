//! Terminal-state detection.
//!
//! `classify` checks, in order: no legal moves (checkmate or stalemate),
//! insufficient material, the fifty-move rule, then threefold repetition.
//! Mate and stalemate therefore take precedence over the clock-based draws.

use std::fmt;

use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, REPETITION_DRAW_COUNT};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    DrawInsufficientMaterial,
    DrawRepetition,
    DrawFiftyMoveRule,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    #[inline]
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawInsufficientMaterial
                | GameStatus::DrawRepetition
                | GameStatus::DrawFiftyMoveRule
        )
    }

    /// PGN result token.
    pub fn result_token(self) -> &'static str {
        match self {
            GameStatus::Ongoing => "*",
            GameStatus::Checkmate {
                winner: Color::White,
            } => "1-0",
            GameStatus::Checkmate {
                winner: Color::Black,
            } => "0-1",
            _ => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Checkmate {
                winner: Color::White,
            } => f.write_str("checkmate, white wins"),
            GameStatus::Checkmate {
                winner: Color::Black,
            } => f.write_str("checkmate, black wins"),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::DrawInsufficientMaterial => f.write_str("draw by insufficient material"),
            GameStatus::DrawRepetition => f.write_str("draw by threefold repetition"),
            GameStatus::DrawFiftyMoveRule => f.write_str("draw by the fifty-move rule"),
        }
    }
}

pub fn classify(position: &Position) -> GameStatus {
    let mut scratch = position.clone();
    classify_in_place(&mut scratch)
}

/// `classify` without the scratch copy; `position` is left unchanged.
pub fn classify_in_place(position: &mut Position) -> GameStatus {
    if !has_legal_move(position) {
        let mover = position.side_to_move;
        return if is_king_in_check(position, mover) {
            GameStatus::Checkmate {
                winner: mover.opposite(),
            }
        } else {
            GameStatus::Stalemate
        };
    }

    rule_draw(position).unwrap_or(GameStatus::Ongoing)
}

/// Draws that do not depend on the move list. Search uses this at interior
/// nodes, where the move list is generated anyway.
pub fn rule_draw(position: &Position) -> Option<GameStatus> {
    if is_insufficient_material(position) {
        Some(GameStatus::DrawInsufficientMaterial)
    } else if position.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        Some(GameStatus::DrawFiftyMoveRule)
    } else if repetition_count(position) >= REPETITION_DRAW_COUNT {
        Some(GameStatus::DrawRepetition)
    } else {
        None
    }
}

/// King vs. king, king and one minor piece vs. king, or any number of
/// bishops that all stand on squares of one color.
pub fn is_insufficient_material(position: &Position) -> bool {
    let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
    for color in [Color::White, Color::Black] {
        if heavy_or_pawn
            .iter()
            .any(|&kind| position.pieces_of(color, kind) != 0)
        {
            return false;
        }
    }

    let knights = position.pieces_of(Color::White, PieceKind::Knight)
        | position.pieces_of(Color::Black, PieceKind::Knight);
    let bishops = position.pieces_of(Color::White, PieceKind::Bishop)
        | position.pieces_of(Color::Black, PieceKind::Bishop);
    let minors = knights.count_ones() + bishops.count_ones();

    if minors <= 1 {
        return true;
    }

    knights == 0 && (bishops & LIGHT_SQUARES == 0 || bishops & !LIGHT_SQUARES == 0)
}

/// Occurrences of the current reduced state within the reversible stretch
/// of the game, the current position included.
pub fn repetition_count(position: &Position) -> usize {
    let window = usize::from(position.halfmove_clock).min(position.repetition_history.len());
    let earlier = position.repetition_history[position.repetition_history.len() - window..]
        .iter()
        .filter(|&&key| key == position.zobrist_key)
        .count();
    earlier + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn status(fen: &str) -> GameStatus {
        classify(&Position::from_fen(fen).expect("FEN should parse"))
    }

    #[test]
    fn back_rank_mate_is_checkmate_for_the_attacker() {
        assert_eq!(
            status("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1"),
            GameStatus::Checkmate {
                winner: Color::White
            }
        );
    }

    #[test]
    fn cornered_king_with_no_moves_is_stalemate() {
        assert_eq!(status("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), GameStatus::Stalemate);
    }

    #[test]
    fn minor_piece_endings_are_dead() {
        assert_eq!(
            status("8/8/4k3/8/8/3NK3/8/8 w - - 0 1"),
            GameStatus::DrawInsufficientMaterial
        );
        // Both bishops on dark squares.
        assert_eq!(
            status("8/8/4k3/8/3b4/8/8/2B1K3 w - - 0 1"),
            GameStatus::DrawInsufficientMaterial
        );
        assert_eq!(status("8/8/4k3/8/2b5/8/8/2B1K3 w - - 0 1"), GameStatus::Ongoing);
        assert_eq!(status("8/8/4k3/8/8/3NK3/3N4/8 w - - 0 1"), GameStatus::Ongoing);
    }

    #[test]
    fn fifty_move_rule_draws_at_one_hundred_halfmoves() {
        assert_eq!(
            status("4k3/8/8/8/8/8/8/R3K3 w - - 100 80"),
            GameStatus::DrawFiftyMoveRule
        );
        assert_eq!(status("4k3/8/8/8/8/8/8/R3K3 w - - 99 80"), GameStatus::Ongoing);
    }

    #[test]
    fn knight_shuffle_repeats_three_times() {
        let mut position = Position::new_game();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        for round in 0..2 {
            for text in shuffle {
                let mv = parse_long_algebraic(text, &position).expect("move should parse");
                position.make_move(mv);
            }
            let expected = if round == 0 {
                GameStatus::Ongoing
            } else {
                GameStatus::DrawRepetition
            };
            assert_eq!(classify(&position), expected);
        }
        assert_eq!(repetition_count(&position), 3);
    }
}
