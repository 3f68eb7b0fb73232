//! Position keys for repetition detection.
//!
//! Every `Position` carries a 64-bit key that `place_piece`, `remove_piece`
//! and `make_move` keep current by xoring the components below in and out.
//! Two positions share a key exactly when they count as the same position for
//! threefold repetition: same pieces on the same squares, same side to move,
//! same castling rights and same en-passant file. The tables come from a fixed
//! seed, so keys are stable across runs and test expectations can rely on them.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;
use crate::moves::attack_tables::squares_of;

const KEY_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct KeyTables {
    /// [color][piece kind][square]
    placement: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    /// Indexed by the four-bit castling-rights mask.
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static KEYS: OnceLock<KeyTables> = OnceLock::new();

#[inline]
fn keys() -> &'static KeyTables {
    KEYS.get_or_init(generate_keys)
}

fn generate_keys() -> KeyTables {
    let mut stream = SplitMix64(KEY_SEED);
    KeyTables {
        placement: std::array::from_fn(|_| {
            std::array::from_fn(|_| std::array::from_fn(|_| stream.next_key()))
        }),
        black_to_move: stream.next_key(),
        castling: std::array::from_fn(|_| stream.next_key()),
        en_passant_file: std::array::from_fn(|_| stream.next_key()),
    }
}

struct SplitMix64(u64);

impl SplitMix64 {
    #[inline]
    fn next_key(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(KEY_SEED);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Key of `piece` of `color` standing on `square`.
#[inline]
pub fn piece_square_key(color: Color, piece: PieceKind, square: Square) -> u64 {
    keys().placement[color.index()][piece.index()][square as usize]
}

#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    keys().castling[(castling_rights & 0x0F) as usize]
}

/// Only the file matters. Without an en-passant square the key is unchanged.
#[inline]
pub fn en_passant_key(en_passant_square: Option<Square>) -> u64 {
    en_passant_square.map_or(0, |sq| keys().en_passant_file[file_of(sq) as usize])
}

/// Present in the key whenever black is to move.
#[inline]
pub fn side_to_move_key() -> u64 {
    keys().black_to_move
}

/// Full key computed from scratch. `Position` maintains the same value
/// incrementally; this is the reference it is checked against.
pub fn compute_zobrist_key(position: &Position) -> u64 {
    let mut key = 0u64;

    for color in [Color::White, Color::Black] {
        for piece in ALL_PIECE_KINDS {
            for sq in squares_of(position.pieces[color.index()][piece.index()]) {
                key ^= piece_square_key(color, piece, sq);
            }
        }
    }

    if position.side_to_move == Color::Black {
        key ^= side_to_move_key();
    }
    key ^= castling_key(position.castling_rights);
    key ^= en_passant_key(position.en_passant_square);

    key
}

#[cfg(test)]
mod tests {
    use super::compute_zobrist_key;
    use crate::game_state::chess_types::Position;
    use crate::utils::long_algebraic::parse_long_algebraic;

    #[test]
    fn starting_position_hash_is_deterministic() {
        let a = Position::new_game();
        let b = Position::new_game();
        assert_eq!(a.zobrist_key, b.zobrist_key);
        assert_eq!(a.zobrist_key, compute_zobrist_key(&a));
    }

    #[test]
    fn side_to_move_changes_hash() {
        let w = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let b = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        assert_ne!(w.zobrist_key, b.zobrist_key);
    }

    #[test]
    fn castling_rights_change_hash() {
        let with_rights =
            Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").expect("FEN should parse");
        let without_rights =
            Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").expect("FEN should parse");
        assert_ne!(with_rights.zobrist_key, without_rights.zobrist_key);
    }

    #[test]
    fn incremental_key_matches_recompute_after_moves() {
        let mut position = Position::new_game();
        for text in ["e2e4", "d7d5", "e4d5", "g8f6", "f1b5", "c7c6"] {
            let mv = parse_long_algebraic(text, &position).expect("move should parse");
            position.make_move(mv);
            assert_eq!(position.zobrist_key, compute_zobrist_key(&position));
        }
    }
}
