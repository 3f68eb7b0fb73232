use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::attack_tables::{pawn_attacks, squares_of};
use crate::moves::chess_move::{
    Move, MoveFlags, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};

pub fn generate_pawn_moves(position: &Position, out: &mut Vec<Move>) {
    let side = position.side_to_move;
    let enemy_occ = position.occupancy_by_color[side.opposite().index()];
    let empty = !position.occupancy_all;

    for from in squares_of(position.pieces_of(side, PieceKind::Pawn)) {
        let one_step = match side {
            Color::White => from + 8,
            Color::Black => from - 8,
        };

        if (1u64 << one_step) & empty != 0 {
            push_pawn_move(out, side, from, one_step, None, 0);

            if rank_of(from) == side.pawn_start_rank() {
                let two_step = match side {
                    Color::White => from + 16,
                    Color::Black => from - 16,
                };
                if (1u64 << two_step) & empty != 0 {
                    out.push(Move::new(
                        from,
                        two_step,
                        PieceKind::Pawn,
                        None,
                        None,
                        FLAG_DOUBLE_PAWN_PUSH,
                    ));
                }
            }
        }

        let attacks = pawn_attacks(side, from);
        for to in squares_of(attacks & enemy_occ) {
            let captured = enemy_piece_on(position, to);
            push_pawn_move(out, side, from, to, captured, FLAG_CAPTURE);
        }

        if let Some(ep) = position.en_passant_square {
            let victim = Position::en_passant_victim_square(side, ep);
            let victim_is_enemy_pawn = position.piece_at(victim)
                == Some(Piece::new(PieceKind::Pawn, side.opposite()));
            if attacks & (1u64 << ep) != 0 && victim_is_enemy_pawn {
                out.push(Move::new(
                    from,
                    ep,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

/// Push a pawn move, expanding arrivals on the last rank into the four
/// promotion choices.
fn push_pawn_move(
    out: &mut Vec<Move>,
    side: Color,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: MoveFlags,
) {
    if rank_of(to) == side.promotion_rank() {
        for promo in PROMOTION_KINDS {
            out.push(Move::new(from, to, PieceKind::Pawn, captured, Some(promo), flags));
        }
    } else {
        out.push(Move::new(from, to, PieceKind::Pawn, captured, None, flags));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_types::*;

    fn pawn_moves(fen: &str) -> Vec<crate::moves::chess_move::Move> {
        let position = Position::from_fen(fen).expect("FEN should parse");
        let mut moves = Vec::new();
        generate_pawn_moves(&position, &mut moves);
        moves
    }

    #[test]
    fn start_rank_pawn_has_single_and_double_push() {
        let moves = pawn_moves("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().any(|m| m.to == 28 && m.is_double_pawn_push()));
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let moves = pawn_moves("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(moves.is_empty());
    }

    #[test]
    fn capture_promotion_expands_to_four_choices() {
        let moves = pawn_moves("3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let captures: Vec<_> = moves.iter().filter(|m| m.is_capture()).collect();
        assert_eq!(captures.len(), 4);
        assert!(captures.iter().all(|m| m.captured == Some(PieceKind::Rook)));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn en_passant_needs_a_pawn_to_capture() {
        let with_victim = pawn_moves("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(with_victim.iter().any(|m| m.is_en_passant() && m.to == 43));

        let without_victim = pawn_moves("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 2");
        assert!(!without_victim.iter().any(|m| m.is_en_passant()));
    }
}
