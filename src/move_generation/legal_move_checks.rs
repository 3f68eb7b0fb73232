//! Attack queries and the legality predicate.
//!
//! Attack detection looks outward from the target square with each piece's
//! attack pattern, so a square is attacked by color C exactly when a piece
//! of C stands on one of the squares that pattern reaches.

use crate::game_state::chess_types::*;
use crate::moves::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks, squares_of,
};
use crate::moves::chess_move::Move;

#[inline]
pub fn king_square(position: &Position, color: Color) -> Option<Square> {
    position.king_square(color)
}

#[inline]
pub fn is_king_in_check(position: &Position, color: Color) -> bool {
    let Some(king_sq) = king_square(position, color) else {
        return false;
    };
    is_square_attacked(position, king_sq, color.opposite())
}

pub fn is_square_attacked(position: &Position, square: Square, attacker_color: Color) -> bool {
    attackers_bitboard(position, square, attacker_color) != 0
}

/// Every piece of `attacker_color` attacking `square`, as a bitboard.
pub fn attackers_bitboard(position: &Position, square: Square, attacker_color: Color) -> u64 {
    let theirs = |kind| position.pieces_of(attacker_color, kind);
    let occ = position.occupancy_all;

    // A pawn of the attacker on `sq` hits `square` iff a defender pawn on
    // `square` would hit `sq`.
    let pawns = pawn_attacks(attacker_color.opposite(), square) & theirs(PieceKind::Pawn);
    let knights = knight_attacks(square) & theirs(PieceKind::Knight);
    let kings = king_attacks(square) & theirs(PieceKind::King);
    let diagonal = bishop_attacks(square, occ) & (theirs(PieceKind::Bishop) | theirs(PieceKind::Queen));
    let straight = rook_attacks(square, occ) & (theirs(PieceKind::Rook) | theirs(PieceKind::Queen));

    pawns | knights | kings | diagonal | straight
}

pub fn attackers_to_square(
    position: &Position,
    square: Square,
    attacker_color: Color,
) -> Vec<(Square, PieceKind)> {
    squares_of(attackers_bitboard(position, square, attacker_color))
        .filter_map(|sq| position.piece_at(sq).map(|p| (sq, p.kind)))
        .collect()
}

/// True when playing the pseudo-legal `mv` leaves the mover's king safe.
///
/// The move is made and unmade on `position` itself; the position is
/// unchanged when this returns.
pub fn is_legal(position: &mut Position, mv: Move) -> bool {
    let mover = position.side_to_move;
    let scoped = position.scoped_move(mv);
    !is_king_in_check(&scoped, mover)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawn_attack_direction_matches_color() {
        let position =
            Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        // Black pawn d5 covers c4 and e4, not c6.
        assert!(is_square_attacked(&position, 26, Color::Black));
        assert!(is_square_attacked(&position, 28, Color::Black));
        assert!(!is_square_attacked(&position, 42, Color::Black));
    }

    #[test]
    fn pinned_piece_move_is_illegal() {
        let mut position =
            Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let before = position.clone();
        let mv = Move::new(12, 18, PieceKind::Knight, None, None, 0);
        assert!(!is_legal(&mut position, mv));
        assert_eq!(position, before);
    }

    #[test]
    fn attackers_list_reports_every_checker() {
        let position =
            Position::from_fen("4k3/8/8/8/b7/8/4r3/4K3 w - - 0 1").expect("FEN should parse");
        let mut attackers = attackers_to_square(&position, 4, Color::Black);
        attackers.sort_unstable();
        assert_eq!(attackers, vec![(12, PieceKind::Rook)]);
        assert!(is_king_in_check(&position, Color::White));
    }
}
