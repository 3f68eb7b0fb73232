use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{not_own_pieces, push_moves_to_targets};
use crate::moves::attack_tables::{queen_attacks, squares_of};
use crate::moves::chess_move::Move;

pub fn generate_queen_moves(position: &Position, out: &mut Vec<Move>) {
    let side = position.side_to_move;
    let allowed = not_own_pieces(position);

    for from in squares_of(position.pieces_of(side, PieceKind::Queen)) {
        let targets = queen_attacks(from, position.occupancy_all) & allowed;
        push_moves_to_targets(position, from, PieceKind::Queen, targets, out);
    }
}
