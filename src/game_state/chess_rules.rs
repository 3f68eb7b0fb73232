//! Canonical chess-rule constants.
//!
//! Static rule literals: the standard starting position, castling geometry and
//! the draw-rule thresholds consulted by the terminal-state detector.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of one reduced state that make a repetition draw.
pub const REPETITION_DRAW_COUNT: usize = 3;

/// King/rook geometry of one castling option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingPath {
    pub right: CastlingRights,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub must_be_empty: &'static [Square],
    /// Squares the king starts on, crosses and lands on.
    pub must_not_be_attacked: &'static [Square],
}

pub const WHITE_KINGSIDE: CastlingPath = CastlingPath {
    right: CASTLE_WHITE_KINGSIDE,
    king_from: 4,
    king_to: 6,
    rook_from: 7,
    rook_to: 5,
    must_be_empty: &[5, 6],
    must_not_be_attacked: &[4, 5, 6],
};

pub const WHITE_QUEENSIDE: CastlingPath = CastlingPath {
    right: CASTLE_WHITE_QUEENSIDE,
    king_from: 4,
    king_to: 2,
    rook_from: 0,
    rook_to: 3,
    must_be_empty: &[1, 2, 3],
    must_not_be_attacked: &[4, 3, 2],
};

pub const BLACK_KINGSIDE: CastlingPath = CastlingPath {
    right: CASTLE_BLACK_KINGSIDE,
    king_from: 60,
    king_to: 62,
    rook_from: 63,
    rook_to: 61,
    must_be_empty: &[61, 62],
    must_not_be_attacked: &[60, 61, 62],
};

pub const BLACK_QUEENSIDE: CastlingPath = CastlingPath {
    right: CASTLE_BLACK_QUEENSIDE,
    king_from: 60,
    king_to: 58,
    rook_from: 56,
    rook_to: 59,
    must_be_empty: &[57, 58, 59],
    must_not_be_attacked: &[60, 59, 58],
};

/// `(kingside, queenside)` paths for `color`.
#[inline]
pub const fn castling_paths(color: Color) -> [CastlingPath; 2] {
    match color {
        Color::White => [WHITE_KINGSIDE, WHITE_QUEENSIDE],
        Color::Black => [BLACK_KINGSIDE, BLACK_QUEENSIDE],
    }
}

/// Castling right lost when a piece leaves or is captured on `square`.
#[inline]
pub const fn castling_right_for_rook_square(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_WHITE_QUEENSIDE,
        7 => CASTLE_WHITE_KINGSIDE,
        56 => CASTLE_BLACK_QUEENSIDE,
        63 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}

#[inline]
pub const fn castling_rights_of(color: Color) -> CastlingRights {
    match color {
        Color::White => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        Color::Black => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
    }
}
