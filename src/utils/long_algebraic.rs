//! Coordinate move notation.
//!
//! Long algebraic (`e2e4`, `e7e8q`) is what the play loop reads. The opening
//! book stores the dashed form (`e2-e4`). Both resolve to a legal `Move` of
//! the given position or fail.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::find_legal_move;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Split coordinate text into `(from, to, promotion)`.
pub fn parse_coordinates(text: &str) -> ChessResult<(Square, Square, Option<PieceKind>)> {
    let trimmed = text.trim();
    if !trimmed.is_ascii() || !(4..=5).contains(&trimmed.len()) {
        return Err(ChessErrors::notation(format!(
            "invalid long algebraic move: {text}"
        )));
    }

    let from = algebraic_to_square(&trimmed[0..2])?;
    let to = algebraic_to_square(&trimmed[2..4])?;
    let promotion = match trimmed[4..].chars().next() {
        None => None,
        Some(ch) => Some(promotion_from_char(ch)?),
    };

    Ok((from, to, promotion))
}

/// Resolve `e2e4` style text to the legal move it names in `position`.
pub fn parse_long_algebraic(text: &str, position: &Position) -> ChessResult<Move> {
    let (from, to, promotion) = parse_coordinates(text)?;
    find_legal_move(position, from, to, promotion)
}

/// Resolve the dashed book form `e2-e4`.
pub fn parse_dashed_move(text: &str, position: &Position) -> ChessResult<Move> {
    let Some((from, to)) = text.trim().split_once('-') else {
        return Err(ChessErrors::notation(format!("invalid dashed move: {text}")));
    };
    parse_long_algebraic(&format!("{from}{to}"), position)
}

/// Dashed form of `mv`, the key format of the opening book.
pub fn move_to_dashed(mv: &Move) -> String {
    format!(
        "{}-{}",
        square_to_algebraic(mv.from),
        square_to_algebraic(mv.to)
    )
}

fn promotion_from_char(ch: char) -> ChessResult<PieceKind> {
    match PieceKind::from_letter(ch) {
        Some(kind) if PROMOTION_KINDS.contains(&kind) => Ok(kind),
        _ => Err(ChessErrors::notation(format!(
            "invalid promotion piece: {ch}"
        ))),
    }
}
