//! Pluggable board evaluation interfaces and implementations.
//!
//! Search stays independent of the heuristic by delegating static scoring to
//! `BoardScorer`. Scores are centipawns from the side to move's perspective.

use crate::config::EvalWeights;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::attackers_bitboard;
use crate::moves::attack_tables::{
    bishop_attacks, knight_attacks, queen_attacks, rook_attacks, squares_of,
};
use crate::tables::piece_square_tables::{king_square_value, piece_square_value};

pub const MATE_SCORE: i32 = 30000;

/// Nominal king value, only seen when a king is missing from the board.
pub const KING_VALUE: i32 = 20000;

/// Non-pawn, non-king material of both sides in the starting position.
pub const STARTING_NON_PAWN_MATERIAL: i32 = 6400;

const CENTER: u64 = (1 << 27) | (1 << 28) | (1 << 35) | (1 << 36);
const LONG_DIAGONALS: u64 = 0x8040_2010_0804_0201 | 0x0102_0408_1020_4080;
const FILE_A: u64 = 0x0101_0101_0101_0101;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, position: &Position) -> i32;
}

/// Standard material value; the king counts zero.
#[inline]
pub const fn piece_value(piece: PieceKind) -> i32 {
    match piece {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

#[inline]
fn from_side_to_move(position: &Position, white_minus_black: i32) -> i32 {
    white_minus_black * position.side_to_move.sign()
}

/// `Some(score)` when a king is gone, which legal play never produces.
fn missing_king_score(position: &Position) -> Option<i32> {
    let white = position.king_square(Color::White).is_some();
    let black = position.king_square(Color::Black).is_some();
    match (white, black) {
        (true, true) => None,
        (true, false) => Some(from_side_to_move(position, KING_VALUE)),
        (false, true) => Some(from_side_to_move(position, -KING_VALUE)),
        (false, false) => Some(0),
    }
}

fn material(position: &Position, color: Color) -> i32 {
    ALL_PIECE_KINDS
        .iter()
        .map(|&kind| position.pieces_of(color, kind).count_ones() as i32 * piece_value(kind))
        .sum()
}

/// Game phase toward the endgame: 0 with all pieces on, 256 with none.
pub fn endgame_phase(position: &Position) -> i32 {
    let mut npm = 0;
    for color in [Color::White, Color::Black] {
        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            npm += position.pieces_of(color, kind).count_ones() as i32 * piece_value(kind);
        }
    }
    256 - npm.min(STARTING_NON_PAWN_MATERIAL) * 256 / STARTING_NON_PAWN_MATERIAL
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, position: &Position) -> i32 {
        if let Some(score) = missing_king_score(position) {
            return score;
        }
        let balance = material(position, Color::White) - material(position, Color::Black);
        from_side_to_move(position, balance)
    }
}

/// Material, phase-blended piece-square tables and the tactical terms of
/// `EvalWeights`.
#[derive(Debug, Clone, Default)]
pub struct TutorScorer {
    pub weights: EvalWeights,
}

impl TutorScorer {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    /// Evaluation of `color`'s pieces alone, before taking the difference.
    fn side_score(&self, position: &Position, color: Color, phase: i32) -> i32 {
        let w = &self.weights;
        let own = position.occupancy_by_color[color.index()];
        let mut score = material(position, color);

        let mut positional = 0;
        for kind in [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            for sq in squares_of(position.pieces_of(color, kind)) {
                positional += piece_square_value(kind, color, sq);
            }
        }
        // Positional weight fades to half as the endgame approaches.
        score += positional * (512 - phase) / 512;

        if let Some(king_sq) = position.king_square(color) {
            score += king_square_value(color, king_sq, phase);
            score += self.king_safety(position, color, king_sq, phase);
        }

        score += (own & CENTER).count_ones() as i32 * w.center_occupation;
        score += self.mobility(position, color);
        score -= self.hanging_pieces(position, color);
        score += self.rooks(position, color);
        score += self.bishops(position, color);
        score += self.knight_outposts(position, color);
        score -= self.pawn_structure(position, color);
        score -= self.early_queen(position, color);

        score
    }

    fn mobility(&self, position: &Position, color: Color) -> i32 {
        let own = position.occupancy_by_color[color.index()];
        let occ = position.occupancy_all;
        let mut moves = 0u32;
        for sq in squares_of(position.pieces_of(color, PieceKind::Knight)) {
            moves += (knight_attacks(sq) & !own).count_ones();
        }
        for sq in squares_of(position.pieces_of(color, PieceKind::Bishop)) {
            moves += (bishop_attacks(sq, occ) & !own).count_ones();
        }
        for sq in squares_of(position.pieces_of(color, PieceKind::Rook)) {
            moves += (rook_attacks(sq, occ) & !own).count_ones();
        }
        for sq in squares_of(position.pieces_of(color, PieceKind::Queen)) {
            moves += (queen_attacks(sq, occ) & !own).count_ones();
        }
        moves as i32 * self.weights.mobility_per_move
    }

    /// Pieces attacked by an enemy piece worth no more than themselves.
    fn hanging_pieces(&self, position: &Position, color: Color) -> i32 {
        let enemy = color.opposite();
        let mut penalty = 0;
        for kind in [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            let value = piece_value(kind);
            for sq in squares_of(position.pieces_of(color, kind)) {
                let cheapest = squares_of(attackers_bitboard(position, sq, enemy))
                    .filter_map(|from| position.piece_at(from))
                    .map(|p| match p.kind {
                        PieceKind::King => KING_VALUE,
                        other => piece_value(other),
                    })
                    .min();
                if cheapest.is_some_and(|attacker| attacker <= value) {
                    penalty += value * self.weights.hanging_piece_percent / 100;
                }
            }
        }
        penalty
    }

    fn rooks(&self, position: &Position, color: Color) -> i32 {
        let w = &self.weights;
        let own_pawns = position.pieces_of(color, PieceKind::Pawn);
        let enemy_pawns = position.pieces_of(color.opposite(), PieceKind::Pawn);
        let mut score = 0;
        for sq in squares_of(position.pieces_of(color, PieceKind::Rook)) {
            let file = FILE_A << file_of(sq);
            if file & own_pawns == 0 {
                score += if file & enemy_pawns == 0 {
                    w.rook_open_file
                } else {
                    w.rook_semi_open_file
                };
            }
            if relative_rank(color, sq) == 6 {
                score += w.rook_seventh_rank;
            }
        }
        score
    }

    fn bishops(&self, position: &Position, color: Color) -> i32 {
        let bishops = position.pieces_of(color, PieceKind::Bishop);
        let mut score = (bishops & LONG_DIAGONALS).count_ones() as i32 * self.weights.long_diagonal;
        if bishops.count_ones() >= 2 {
            score += self.weights.bishop_pair;
        }
        score
    }

    fn knight_outposts(&self, position: &Position, color: Color) -> i32 {
        let enemy_pawns = position.pieces_of(color.opposite(), PieceKind::Pawn);
        let mut score = 0;
        for sq in squares_of(position.pieces_of(color, PieceKind::Knight)) {
            let rank = relative_rank(color, sq);
            if !(4..=6).contains(&rank) {
                continue;
            }
            let can_be_chased = squares_of(enemy_pawns & adjacent_files(file_of(sq)))
                .any(|pawn| relative_rank(color, pawn) > rank);
            if !can_be_chased {
                score += self.weights.knight_outpost;
            }
        }
        score
    }

    /// Doubled, isolated and backward pawn penalties.
    fn pawn_structure(&self, position: &Position, color: Color) -> i32 {
        let w = &self.weights;
        let pawns = position.pieces_of(color, PieceKind::Pawn);
        let mut penalty = 0;

        for file in 0..8u8 {
            let on_file = (pawns & (FILE_A << file)).count_ones() as i32;
            if on_file > 1 {
                penalty += (on_file - 1) * w.doubled_pawn;
            }
        }

        for sq in squares_of(pawns) {
            let neighbours = pawns & adjacent_files(file_of(sq));
            if neighbours == 0 {
                penalty += w.isolated_pawn;
                continue;
            }
            let rank = relative_rank(color, sq);
            if squares_of(neighbours).all(|n| relative_rank(color, n) > rank) {
                penalty += w.backward_pawn;
            }
        }

        penalty
    }

    fn early_queen(&self, position: &Position, color: Color) -> i32 {
        let queens = position.pieces_of(color, PieceKind::Queen);
        let home = square_at(3, color.back_rank());
        if queens == 0 || queens & (1u64 << home) != 0 {
            return 0;
        }
        let back_rank = 0xFFu64 << (8 * color.back_rank());
        let minors =
            position.pieces_of(color, PieceKind::Knight) | position.pieces_of(color, PieceKind::Bishop);
        let developed = (minors & !back_rank).count_ones();
        if developed < self.weights.early_queen_min_developed {
            self.weights.early_queen
        } else {
            0
        }
    }

    /// Pawn shield in front of a wing king and the central-king penalty,
    /// both fading out toward the endgame.
    fn king_safety(&self, position: &Position, color: Color, king_sq: Square, phase: i32) -> i32 {
        let w = &self.weights;
        let file = file_of(king_sq);
        let mut score = 0;

        if (2..=5).contains(&file) {
            score -= w.central_king;
        } else if relative_rank(color, king_sq) == 0 {
            let shield_rank = match color {
                Color::White => 1u8,
                Color::Black => 6u8,
            };
            let shield_files = adjacent_files(file) | (FILE_A << file);
            let shield = shield_files & (0xFFu64 << (8 * shield_rank));
            score += (position.pieces_of(color, PieceKind::Pawn) & shield).count_ones() as i32
                * w.pawn_shield;
        }

        score * (256 - phase) / 256
    }
}

#[inline]
fn adjacent_files(file: u8) -> u64 {
    let mut mask = 0;
    if file > 0 {
        mask |= FILE_A << (file - 1);
    }
    if file < 7 {
        mask |= FILE_A << (file + 1);
    }
    mask
}

/// Tutor evaluation with the default weights.
pub fn evaluate(position: &Position) -> i32 {
    TutorScorer::default().score(position)
}

impl BoardScorer for TutorScorer {
    fn score(&self, position: &Position) -> i32 {
        if let Some(score) = missing_king_score(position) {
            return score;
        }
        let phase = endgame_phase(position);
        let white = self.side_score(position, Color::White, phase);
        let black = self.side_score(position, Color::Black, phase);
        from_side_to_move(position, white - black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tutor(fen: &str) -> i32 {
        let position = Position::from_fen(fen).expect("FEN should parse");
        TutorScorer::default().score(&position)
    }

    #[test]
    fn start_position_is_balanced() {
        let position = Position::new_game();
        assert_eq!(MaterialScorer.score(&position), 0);
        assert_eq!(TutorScorer::default().score(&position), 0);
        assert_eq!(endgame_phase(&position), 0);
    }

    #[test]
    fn score_flips_with_side_to_move() {
        let white = tutor("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let black = tutor("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        assert!(white > 400);
        assert_eq!(white, -black);
    }

    #[test]
    fn missing_king_is_a_sentinel() {
        let mut position = Position::new_game();
        position.remove_piece(60);
        assert_eq!(MaterialScorer.score(&position), KING_VALUE);
    }

    #[test]
    fn central_pawns_beat_rim_pawns() {
        let center = tutor("4k3/8/8/8/3PP3/8/8/4K3 w - - 0 1");
        let rim = tutor("4k3/8/8/8/P6P/8/8/4K3 w - - 0 1");
        assert!(center > rim);
    }

    #[test]
    fn pawn_structure_penalties() {
        let scorer = TutorScorer::default();
        let doubled = Position::from_fen("4k3/8/8/8/4P3/4P3/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        // Two pawns on one file, both isolated.
        assert_eq!(scorer.pawn_structure(&doubled, Color::White), 10 + 15 + 15);

        let backward = Position::from_fen("4k3/8/8/8/3P4/4P3/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        // e3 trails its only neighbour on d4.
        assert_eq!(scorer.pawn_structure(&backward, Color::White), 12);
    }

    #[test]
    fn rook_file_and_rank_bonuses() {
        let scorer = TutorScorer::default();
        let position = Position::from_fen("4k3/R5p1/8/8/8/8/6P1/4K1R1 w - - 0 1")
            .expect("FEN should parse");
        // a7: open file + seventh rank. g1: own pawn on the file.
        assert_eq!(scorer.rooks(&position, Color::White), 15 + 20);
    }

    #[test]
    fn early_queen_sortie_is_penalised() {
        let scorer = TutorScorer::default();
        let position =
            Position::from_fen("rnbqkbnr/pppp1ppp/8/4p2Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2")
                .expect("FEN should parse");
        assert_eq!(scorer.early_queen(&position, Color::White), 30);
        assert_eq!(scorer.early_queen(&position, Color::Black), 0);
    }

    #[test]
    fn hanging_piece_needs_cheaper_attacker() {
        let scorer = TutorScorer::default();
        // Knight on d5 attacked by the e6 pawn.
        let attacked =
            Position::from_fen("4k3/8/4p3/3N4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(scorer.hanging_pieces(&attacked, Color::White), 320 * 15 / 100);
        // Pawn on d5 attacked only by a rook.
        let safe =
            Position::from_fen("3rk3/8/8/3P4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(scorer.hanging_pieces(&safe, Color::White), 0);
    }
}
