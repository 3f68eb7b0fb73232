//! Reversible board state.
//!
//! `Position` keeps a mailbox (`board`) for "what stands on this square"
//! lookups next to per-piece bitboards for attack and mobility work. Both
//! views are only ever changed together through `place_piece` and
//! `remove_piece`, which also keep the Zobrist key current.
//!
//! Moves are applied in place with `make_move`, which returns the
//! `UndoState` needed to restore the exact prior state with `unmake_move`.
//! Speculative moves in legality checks and search go through `ScopedMove`,
//! whose drop performs the unmake.

use std::ops::{Deref, DerefMut};

use crate::chess_errors::ChessResult;
use crate::game_state::chess_rules::{
    castling_paths, castling_right_for_rook_square, castling_rights_of, CastlingPath,
};
use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, FLAG_KINGSIDE_CASTLE};
use crate::search::zobrist::{
    castling_key, compute_zobrist_key, en_passant_key, piece_square_key, side_to_move_key,
};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const BACK_RANK_ORDER: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: [Option<Piece>; 64],

    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,
    /// Keys of every earlier position of the game, oldest first.
    pub repetition_history: Vec<u64>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            board: [None; 64],
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: castling_key(0),
            repetition_history: Vec::new(),
        }
    }
}

impl Position {
    /// Board with no pieces, white to move. Used by the FEN parser and tests.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard initial layout.
    pub fn new_game() -> Self {
        let mut position = Self::new_empty();
        for (file, kind) in BACK_RANK_ORDER.iter().enumerate() {
            let file = file as u8;
            position.place_piece(square_at(file, 0), Piece::new(*kind, Color::White));
            position.place_piece(square_at(file, 1), Piece::new(PieceKind::Pawn, Color::White));
            position.place_piece(square_at(file, 6), Piece::new(PieceKind::Pawn, Color::Black));
            position.place_piece(square_at(file, 7), Piece::new(*kind, Color::Black));
        }
        position.castling_rights = CASTLE_ALL;
        position.refresh_zobrist_key();
        position
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces_of(color, PieceKind::King);
        (kings != 0).then(|| kings.trailing_zeros() as Square)
    }

    /// Put `piece` on an empty `square`.
    pub fn place_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.board[square as usize].is_none());
        let mask = 1u64 << square;
        self.board[square as usize] = Some(piece);
        self.pieces[piece.color.index()][piece.kind.index()] |= mask;
        self.occupancy_by_color[piece.color.index()] |= mask;
        self.occupancy_all |= mask;
        self.zobrist_key ^= piece_square_key(piece.color, piece.kind, square);
    }

    /// Clear `square`, returning what stood there.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board[square as usize].take()?;
        let mask = !(1u64 << square);
        self.pieces[piece.color.index()][piece.kind.index()] &= mask;
        self.occupancy_by_color[piece.color.index()] &= mask;
        self.occupancy_all &= mask;
        self.zobrist_key ^= piece_square_key(piece.color, piece.kind, square);
        Some(piece)
    }

    #[inline]
    pub fn refresh_zobrist_key(&mut self) {
        self.zobrist_key = compute_zobrist_key(self);
    }

    /// Square of the pawn removed by an en-passant capture landing on `to`.
    #[inline]
    pub fn en_passant_victim_square(mover: Color, to: Square) -> Square {
        match mover {
            Color::White => to - 8,
            Color::Black => to + 8,
        }
    }

    /// Apply `mv` in place. The move must be pseudo-legal for this position;
    /// legality is the caller's concern.
    pub fn make_move(&mut self, mv: Move) -> UndoState {
        let mover = self.side_to_move;
        let undo_base = UndoState {
            mv,
            captured_piece: None,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
            prev_fullmove_number: self.fullmove_number,
            prev_zobrist_key: self.zobrist_key,
        };

        self.repetition_history.push(self.zobrist_key);

        let capture_square = if mv.is_en_passant() {
            Self::en_passant_victim_square(mover, mv.to)
        } else {
            mv.to
        };
        let captured_piece = self.remove_piece(capture_square).map(|p| p.kind);

        let moved = self.remove_piece(mv.from).map_or(mv.piece, |p| p.kind);
        let landed = mv.promotion.unwrap_or(moved);
        self.place_piece(mv.to, Piece::new(landed, mover));

        if mv.is_castle() {
            let path = castling_path_for(mover, mv);
            if let Some(rook) = self.remove_piece(path.rook_from) {
                self.place_piece(path.rook_to, rook);
            }
        }

        self.zobrist_key ^= castling_key(self.castling_rights);
        if moved == PieceKind::King {
            self.castling_rights &= !castling_rights_of(mover);
        }
        self.castling_rights &= !castling_right_for_rook_square(mv.from);
        self.castling_rights &= !castling_right_for_rook_square(mv.to);
        self.zobrist_key ^= castling_key(self.castling_rights);

        self.zobrist_key ^= en_passant_key(self.en_passant_square);
        self.en_passant_square = mv
            .is_double_pawn_push()
            .then(|| (mv.from + mv.to) / 2);
        self.zobrist_key ^= en_passant_key(self.en_passant_square);

        if moved == PieceKind::Pawn || captured_piece.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if mover == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = mover.opposite();
        self.zobrist_key ^= side_to_move_key();

        UndoState {
            captured_piece,
            ..undo_base
        }
    }

    /// Exact inverse of the `make_move` call that produced `undo`.
    pub fn unmake_move(&mut self, undo: &UndoState) {
        let mv = undo.mv;
        let mover = self.side_to_move.opposite();
        self.side_to_move = mover;

        if mv.is_castle() {
            let path = castling_path_for(mover, mv);
            if let Some(rook) = self.remove_piece(path.rook_to) {
                self.place_piece(path.rook_from, rook);
            }
        }

        self.remove_piece(mv.to);
        self.place_piece(mv.from, Piece::new(mv.piece, mover));

        if let Some(kind) = undo.captured_piece {
            let capture_square = if mv.is_en_passant() {
                Self::en_passant_victim_square(mover, mv.to)
            } else {
                mv.to
            };
            self.place_piece(capture_square, Piece::new(kind, mover.opposite()));
        }

        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.fullmove_number = undo.prev_fullmove_number;
        self.zobrist_key = undo.prev_zobrist_key;
        self.repetition_history.pop();
    }

    /// Apply `mv` for the lifetime of the returned guard.
    #[inline]
    pub fn scoped_move(&mut self, mv: Move) -> ScopedMove<'_> {
        let undo = self.make_move(mv);
        ScopedMove {
            position: self,
            undo,
        }
    }
}

#[inline]
fn castling_path_for(mover: Color, mv: Move) -> CastlingPath {
    let [kingside, queenside] = castling_paths(mover);
    if mv.has_flag(FLAG_KINGSIDE_CASTLE) {
        kingside
    } else {
        queenside
    }
}

/// A move applied to a borrowed `Position`, undone when the guard drops.
pub struct ScopedMove<'a> {
    position: &'a mut Position,
    undo: UndoState,
}

impl ScopedMove<'_> {
    #[inline]
    pub fn undo_state(&self) -> &UndoState {
        &self.undo
    }
}

impl Deref for ScopedMove<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for ScopedMove<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        self.position.unmake_move(&self.undo);
    }
}
