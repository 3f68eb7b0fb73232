//! Move representation.
//!
//! A `Move` is a small `Copy` record carrying everything make/unmake and move
//! ordering need without looking at the board again: squares, the moving
//! piece, the captured piece, the promotion choice and a flag set.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

pub type MoveFlags = u8;

pub const FLAG_CAPTURE: MoveFlags = 1 << 0;
pub const FLAG_DOUBLE_PAWN_PUSH: MoveFlags = 1 << 1;
pub const FLAG_EN_PASSANT: MoveFlags = 1 << 2;
pub const FLAG_KINGSIDE_CASTLE: MoveFlags = 1 << 3;
pub const FLAG_QUEENSIDE_CASTLE: MoveFlags = 1 << 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        piece: PieceKind,
        captured: Option<PieceKind>,
        promotion: Option<PieceKind>,
        flags: MoveFlags,
    ) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            promotion,
            flags,
        }
    }

    #[inline]
    pub const fn has_flag(&self, flag: MoveFlags) -> bool {
        (self.flags & flag) != 0
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.has_flag(FLAG_CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.has_flag(FLAG_EN_PASSANT)
    }

    #[inline]
    pub const fn is_double_pawn_push(&self) -> bool {
        self.has_flag(FLAG_DOUBLE_PAWN_PUSH)
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.has_flag(FLAG_KINGSIDE_CASTLE | FLAG_QUEENSIDE_CASTLE)
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Long algebraic form, e.g. `e2e4` or `e7e8q`.
    pub fn to_long_algebraic(&self) -> String {
        let mut out = String::with_capacity(5);
        out.push_str(&square_to_algebraic(self.from));
        out.push_str(&square_to_algebraic(self.to));
        if let Some(promo) = self.promotion {
            out.push(promo.letter().to_ascii_lowercase());
        }
        out
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_algebraic())
    }
}
