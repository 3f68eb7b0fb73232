//! Validated move application for callers outside the search.
//!
//! Search works on one mutable `Position` with make/unmake. Callers that hold
//! a position they do not want touched use `apply_move`, which checks the move
//! against the legal move list and returns the successor with its undo record.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::square_to_algebraic;

/// Play a legal `mv` on a copy of `position`.
pub fn apply_move(position: &Position, mv: Move) -> ChessResult<(Position, UndoState)> {
    let mut next = position.clone();
    let legal = generate_legal_moves(&mut next);
    if !legal.contains(&mv) {
        return Err(ChessErrors::illegal(
            mv.to_long_algebraic(),
            "not a legal move in this position",
        ));
    }
    let undo = next.make_move(mv);
    Ok((next, undo))
}

/// Restore the position `apply_move` (or `make_move`) started from.
#[inline]
pub fn unapply_move(position: &mut Position, undo: &UndoState) {
    position.unmake_move(undo);
}

/// Resolve a `(from, to, promotion)` request into the legal move it names.
///
/// A pawn reaching the last rank without an explicit choice promotes to a
/// queen.
pub fn find_legal_move(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> ChessResult<Move> {
    if from > 63 || to > 63 {
        return Err(ChessErrors::illegal(
            format!("square {from} to square {to}"),
            "square is off the board",
        ));
    }

    let requested = format!(
        "{}{}{}",
        square_to_algebraic(from),
        square_to_algebraic(to),
        promotion
            .map(|p| p.letter().to_ascii_lowercase().to_string())
            .unwrap_or_default()
    );

    let Some(piece) = position.piece_at(from) else {
        return Err(ChessErrors::illegal(requested, "no piece on the source square"));
    };
    if piece.color != position.side_to_move {
        return Err(ChessErrors::illegal(
            requested,
            "piece does not belong to the side to move",
        ));
    }

    let candidates: Vec<Move> = legal_moves_between(position, from, to);
    if candidates.is_empty() {
        return Err(ChessErrors::illegal(
            requested,
            "move is not legal in this position",
        ));
    }

    let wanted = if candidates.iter().any(Move::is_promotion) {
        Some(promotion.unwrap_or(PieceKind::Queen))
    } else if promotion.is_some() {
        return Err(ChessErrors::illegal(requested, "only pawns on the last rank promote"));
    } else {
        None
    };

    candidates
        .into_iter()
        .find(|mv| mv.promotion == wanted)
        .ok_or_else(|| ChessErrors::illegal(requested, "invalid promotion piece"))
}

fn legal_moves_between(position: &Position, from: Square, to: Square) -> Vec<Move> {
    let mut scratch = position.clone();
    generate_legal_moves(&mut scratch)
        .into_iter()
        .filter(|mv| mv.from == from && mv.to == to)
        .collect()
}
