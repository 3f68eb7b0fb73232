//! Helpers shared by the per-piece generators.

use crate::game_state::chess_types::*;
use crate::moves::attack_tables::squares_of;
use crate::moves::chess_move::{Move, FLAG_CAPTURE};

/// Push one move per set bit of `targets`, flagging captures from the board.
///
/// `targets` must already exclude squares holding the mover's own pieces.
#[inline]
pub fn push_moves_to_targets(
    position: &Position,
    from: Square,
    piece: PieceKind,
    targets: u64,
    out: &mut Vec<Move>,
) {
    for to in squares_of(targets) {
        let captured = enemy_piece_on(position, to);
        let flags = if captured.is_some() { FLAG_CAPTURE } else { 0 };
        out.push(Move::new(from, to, piece, captured, None, flags));
    }
}

#[inline]
pub fn enemy_piece_on(position: &Position, square: Square) -> Option<PieceKind> {
    position
        .piece_at(square)
        .filter(|p| p.color != position.side_to_move)
        .map(|p| p.kind)
}

/// Bitboard of squares the mover may land on: empty or enemy-occupied.
#[inline]
pub fn not_own_pieces(position: &Position) -> u64 {
    !position.occupancy_by_color[position.side_to_move.index()]
}
