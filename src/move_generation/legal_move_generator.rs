//! Full legal move generation pipeline.
//!
//! Orchestrates piece-wise pseudo-legal generation, then filters out every
//! move that leaves the mover's own king attacked.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_legal;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::chess_move::Move;

/// Every move obeying piece movement rules for the side to move, including
/// castling, whether or not it exposes the mover's king.
pub fn generate_pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);

    generate_pawn_moves(position, &mut pseudo);
    generate_knight_moves(position, &mut pseudo);
    generate_bishop_moves(position, &mut pseudo);
    generate_rook_moves(position, &mut pseudo);
    generate_queen_moves(position, &mut pseudo);
    generate_king_moves(position, &mut pseudo);

    pseudo
}

/// Legal moves via make/unmake on `position`, which is left unchanged.
pub fn generate_legal_moves(position: &mut Position) -> Vec<Move> {
    let pseudo = generate_pseudo_legal_moves(position);
    pseudo
        .into_iter()
        .filter(|&mv| is_legal(position, mv))
        .collect()
}

/// Legal moves of a shared position, filtered on a private scratch copy.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let mut scratch = position.clone();
    generate_legal_moves(&mut scratch)
}

/// Stops at the first legal move found.
pub fn has_legal_move(position: &mut Position) -> bool {
    generate_pseudo_legal_moves(position)
        .into_iter()
        .any(|mv| is_legal(position, mv))
}
