use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{not_own_pieces, push_moves_to_targets};
use crate::moves::attack_tables::{rook_attacks, squares_of};
use crate::moves::chess_move::Move;

pub fn generate_rook_moves(position: &Position, out: &mut Vec<Move>) {
    let side = position.side_to_move;
    let allowed = not_own_pieces(position);

    for from in squares_of(position.pieces_of(side, PieceKind::Rook)) {
        let targets = rook_attacks(from, position.occupancy_all) & allowed;
        push_moves_to_targets(position, from, PieceKind::Rook, targets, out);
    }
}

#[cfg(test)]
mod tests {
    use super::generate_rook_moves;
    use crate::game_state::chess_types::Position;

    #[test]
    fn rook_stops_before_friend_and_on_enemy() {
        // Rook a1, own pawn a3, enemy knight c1.
        let position =
            Position::from_fen("4k3/8/8/8/8/P7/8/R1n1K3 w - - 0 1").expect("FEN should parse");
        let mut moves = Vec::new();
        generate_rook_moves(&position, &mut moves);
        let targets: Vec<u8> = moves.iter().map(|m| m.to).collect();
        assert_eq!(moves.len(), 3);
        assert!(targets.contains(&8));
        assert!(targets.contains(&1));
        assert!(targets.contains(&2));
        assert!(moves.iter().any(|m| m.to == 2 && m.is_capture()));
    }
}
