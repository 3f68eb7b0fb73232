//! Perft: exhaustive legal-move tree counting for generator verification.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::generate_legal_moves;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

/// Count leaf nodes (and leaf move kinds) `depth` plies below `position`.
pub fn perft(position: &mut Position, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generate_legal_moves(position) {
        if depth == 1 {
            total.nodes += 1;
            total.captures += u64::from(mv.is_capture());
            total.en_passant += u64::from(mv.is_en_passant());
            total.castles += u64::from(mv.is_castle());
            total.promotions += u64::from(mv.is_promotion());
            continue;
        }
        let mut child = position.scoped_move(mv);
        total.merge(perft(&mut child, depth - 1));
    }
    total
}

/// Per-root-move node counts, sorted by long algebraic text.
pub fn perft_divide(position: &mut Position, depth: u8) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut out: Vec<(String, u64)> = generate_legal_moves(position)
        .into_iter()
        .map(|mv| {
            let mut child = position.scoped_move(mv);
            (mv.to_long_algebraic(), perft(&mut child, depth - 1).nodes)
        })
        .collect();
    out.sort();
    out
}
