//! Opening book keyed by the game's move history.
//!
//! A key is the comma-joined dashed form of every move played so far
//! (`e2-e4,e7-e5`), the empty key standing for a game with no moves yet.
//! Lookup tries the full history first and then only its last two moves, so
//! a familiar pair still hits after a transposition. Candidates are plain
//! notation and are always run through the legality filter before use.

use std::collections::HashMap;

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::long_algebraic::{move_to_dashed, parse_dashed_move};

/// Picks one move among the legal book candidates.
pub trait BookStrategy: Send {
    fn choose(&mut self, candidates: &[Move]) -> Option<Move>;
}

/// Uniform random choice. Seed it for reproducible games.
#[derive(Debug, Clone)]
pub struct SeededRandomBook {
    rng: StdRng,
}

impl SeededRandomBook {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl BookStrategy for SeededRandomBook {
    fn choose(&mut self, candidates: &[Move]) -> Option<Move> {
        if candidates.is_empty() {
            return None;
        }
        let pick = self.rng.random_range(0..candidates.len());
        Some(candidates[pick])
    }
}

/// Always the first listed candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidateBook;

impl BookStrategy for FirstCandidateBook {
    fn choose(&mut self, candidates: &[Move]) -> Option<Move> {
        candidates.first().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_sequence: HashMap<String, Vec<String>>,
}

impl OpeningBook {
    /// The embedded tutor repertoire.
    pub fn load_default() -> Self {
        match Self::from_tsv_str(include_str!("data/tutor_openings.tsv")) {
            Ok(book) => book,
            Err(e) => {
                warn!("embedded opening book rejected: {e}");
                Self::default()
            }
        }
    }

    /// Parse `sequence<TAB>candidates` rows. The sequence is comma-joined
    /// dashed moves (empty for the initial position), candidates are
    /// whitespace-separated dashed moves. A header row naming the columns is
    /// skipped.
    pub fn from_tsv_str(tsv: &str) -> ChessResult<Self> {
        let mut by_sequence: HashMap<String, Vec<String>> = HashMap::new();

        for line in tsv.lines().filter(|line| !line.trim().is_empty()) {
            let (sequence, candidates) = line.split_once('\t').ok_or_else(|| {
                ChessErrors::notation(format!("opening row '{line}' has no tab separator"))
            })?;
            let sequence = sequence.trim();
            if sequence.eq_ignore_ascii_case("sequence") {
                continue;
            }

            if !sequence.is_empty() {
                for token in sequence.split(',') {
                    check_dashed(token.trim(), line)?;
                }
            }

            let row = by_sequence.entry(sequence.to_owned()).or_default();
            for token in candidates.split_whitespace() {
                check_dashed(token, line)?;
                if !row.iter().any(|existing| existing == token) {
                    row.push(token.to_owned());
                }
            }
        }

        Ok(Self { by_sequence })
    }

    pub fn len(&self) -> usize {
        self.by_sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sequence.is_empty()
    }

    pub fn candidates_for_key(&self, key: &str) -> Option<&[String]> {
        self.by_sequence
            .get(key)
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }

    /// Legal book moves for `position`, reached by playing `history` from
    /// the start of the game. Full-history entries win; the last-two-moves
    /// entry is used when the full key is missing or none of its candidates
    /// is legal.
    pub fn legal_candidates(&self, position: &Position, history: &[Move]) -> Vec<Move> {
        let full_key = sequence_key(history);
        let tail_key = sequence_key(&history[history.len().saturating_sub(2)..]);

        let mut keys = vec![full_key];
        if tail_key != keys[0] {
            keys.push(tail_key);
        }

        for key in keys {
            let Some(candidates) = self.candidates_for_key(&key) else {
                continue;
            };
            let legal: Vec<Move> = candidates
                .iter()
                .filter_map(|text| match parse_dashed_move(text, position) {
                    Ok(mv) => Some(mv),
                    Err(e) => {
                        warn!("skipping book move {text} after '{key}': {e}");
                        None
                    }
                })
                .collect();
            if !legal.is_empty() {
                return legal;
            }
        }

        Vec::new()
    }
}

pub fn sequence_key(history: &[Move]) -> String {
    history
        .iter()
        .map(move_to_dashed)
        .collect::<Vec<_>>()
        .join(",")
}

fn check_dashed(token: &str, line: &str) -> ChessResult<()> {
    let valid = token
        .split_once('-')
        .is_some_and(|(from, to)| algebraic_to_square(from).is_ok() && algebraic_to_square(to).is_ok());
    if valid {
        Ok(())
    } else {
        Err(ChessErrors::notation(format!(
            "bad book move '{token}' in opening row '{line}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn play(position: &mut Position, moves: &[&str]) -> Vec<Move> {
        moves
            .iter()
            .map(|text| {
                let mv = parse_long_algebraic(text, position).expect("move should be legal");
                position.make_move(mv);
                mv
            })
            .collect()
    }

    #[test]
    fn embedded_book_answers_king_pawn() {
        let book = OpeningBook::load_default();
        assert_eq!(book.len(), 13);
        let mut position = Position::new_game();
        let history = play(&mut position, &["e2e4"]);
        let texts: Vec<String> = book
            .legal_candidates(&position, &history)
            .iter()
            .map(move_to_dashed)
            .collect();
        assert_eq!(texts, vec!["e7-e5", "c7-c5", "e7-e6", "d7-d6"]);
    }

    #[test]
    fn wrong_side_entries_are_filtered_out() {
        // The empty-history row lists black replies; white gets nothing.
        let book = OpeningBook::load_default();
        let position = Position::new_game();
        assert!(book.legal_candidates(&position, &[]).is_empty());
    }

    #[test]
    fn falls_back_to_the_last_two_moves() {
        let book = OpeningBook::load_default();
        let mut position = Position::new_game();
        let history = play(&mut position, &["g1f3", "g8f6", "e2e4", "e7e5"]);
        assert_eq!(sequence_key(&history[2..]), "e2-e4,e7-e5");
        let texts: Vec<String> = book
            .legal_candidates(&position, &history)
            .iter()
            .map(move_to_dashed)
            .collect();
        // The g1 knight has already left, so only the bishop and pawn moves remain.
        assert_eq!(texts, vec!["f1-c4", "d2-d3"]);
    }

    #[test]
    fn unknown_history_has_no_candidates() {
        let book = OpeningBook::load_default();
        let mut position = Position::new_game();
        let history = play(&mut position, &["a2a3", "h7h6"]);
        assert!(book.legal_candidates(&position, &history).is_empty());
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(OpeningBook::from_tsv_str("e2-e4\te7-e9\n").is_err());
        assert!(OpeningBook::from_tsv_str("e2e4 e7e5\n").is_err());
    }

    #[test]
    fn seeded_strategy_is_reproducible() {
        let mut position = Position::new_game();
        let history = play(&mut position, &["d2d4"]);
        let candidates = OpeningBook::load_default().legal_candidates(&position, &history);
        assert_eq!(candidates.len(), 4);

        let mut seeds = StdRng::seed_from_u64(42);
        for _ in 0..8 {
            let seed: u64 = seeds.random();
            let a = SeededRandomBook::from_seed(seed).choose(&candidates);
            let b = SeededRandomBook::from_seed(seed).choose(&candidates);
            assert_eq!(a, b);
            assert!(a.is_some_and(|mv| candidates.contains(&mv)));
        }
        assert_eq!(FirstCandidateBook.choose(&candidates), Some(candidates[0]));
        assert_eq!(FirstCandidateBook.choose(&[]), None);
    }
}
