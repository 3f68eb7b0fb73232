use crate::game_state::chess_rules::castling_paths;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{not_own_pieces, push_moves_to_targets};
use crate::moves::attack_tables::king_attacks;
use crate::moves::chess_move::{Move, FLAG_KINGSIDE_CASTLE, FLAG_QUEENSIDE_CASTLE};

pub fn generate_king_moves(position: &Position, out: &mut Vec<Move>) {
    let side = position.side_to_move;
    let Some(from) = position.king_square(side) else {
        return;
    };

    push_moves_to_targets(
        position,
        from,
        PieceKind::King,
        king_attacks(from) & not_own_pieces(position),
        out,
    );

    generate_castling_moves(position, from, out);
}

/// Castling needs the right, an empty path, the rook still in its corner and
/// a king that neither starts in, crosses nor lands on an attacked square.
fn generate_castling_moves(position: &Position, king_from: Square, out: &mut Vec<Move>) {
    let side = position.side_to_move;
    let enemy = side.opposite();
    let own_rook = Some(Piece::new(PieceKind::Rook, side));

    for (path, flag) in castling_paths(side)
        .into_iter()
        .zip([FLAG_KINGSIDE_CASTLE, FLAG_QUEENSIDE_CASTLE])
    {
        if position.castling_rights & path.right == 0
            || king_from != path.king_from
            || position.piece_at(path.rook_from) != own_rook
        {
            continue;
        }
        if path
            .must_be_empty
            .iter()
            .any(|&sq| position.piece_at(sq).is_some())
        {
            continue;
        }
        if path
            .must_not_be_attacked
            .iter()
            .any(|&sq| is_square_attacked(position, sq, enemy))
        {
            continue;
        }
        out.push(Move::new(
            path.king_from,
            path.king_to,
            PieceKind::King,
            None,
            None,
            flag,
        ));
    }
}
