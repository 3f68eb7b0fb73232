//! Engine configuration.
//!
//! Everything the tutor engine can be tuned with lives here, deserializable
//! from JSON. Missing fields fall back to the defaults below, so a config file
//! only needs the values it changes.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chess_errors::{ChessErrors, ChessResult};

/// Opponent strength on the tutor's 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> ChessResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ChessErrors::InvalidConfig(format!(
                "difficulty must be between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Full-width search depth in plies.
    pub const fn search_depth(self) -> u8 {
        match self.0 {
            1 | 2 => 1,
            3 => 2,
            4 => 3,
            _ => 4,
        }
    }

    /// How many root moves, best-ordered first, are searched. `None` searches
    /// them all.
    pub const fn root_move_cap(self) -> Option<usize> {
        match self.0 {
            1 => Some(8),
            2 => Some(10),
            3 => Some(15),
            4 => Some(20),
            _ => None,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ChessErrors;

    fn try_from(level: u8) -> ChessResult<Self> {
        Self::new(level)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> u8 {
        difficulty.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tactical evaluation constants, in centipawns unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Per own piece on d4, e4, d5 or e5.
    pub center_occupation: i32,
    /// Per pseudo-legal destination of a non-pawn, non-king piece.
    pub mobility_per_move: i32,
    /// Percent of a piece's value lost when a cheaper or equal enemy piece
    /// attacks it.
    pub hanging_piece_percent: i32,
    pub rook_open_file: i32,
    pub rook_semi_open_file: i32,
    /// Rook on the opponent's second rank.
    pub rook_seventh_rank: i32,
    pub bishop_pair: i32,
    /// Bishop standing on either long diagonal.
    pub long_diagonal: i32,
    pub doubled_pawn: i32,
    pub isolated_pawn: i32,
    pub backward_pawn: i32,
    /// Penalty for a queen off its home square while fewer than
    /// `early_queen_min_developed` minor pieces have left the back rank.
    pub early_queen: i32,
    pub early_queen_min_developed: u32,
    /// Knight on the opponent's half that no enemy pawn can attack.
    pub knight_outpost: i32,
    /// Per own pawn directly in front of a castled king.
    pub pawn_shield: i32,
    /// King on files c..=f while the middlegame lasts.
    pub central_king: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            center_occupation: 10,
            mobility_per_move: 2,
            hanging_piece_percent: 15,
            rook_open_file: 15,
            rook_semi_open_file: 10,
            rook_seventh_rank: 20,
            bishop_pair: 30,
            long_diagonal: 5,
            doubled_pawn: 10,
            isolated_pawn: 15,
            backward_pawn: 12,
            early_queen: 30,
            early_queen_min_developed: 2,
            knight_outpost: 15,
            pawn_shield: 10,
            central_king: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    pub use_opening_book: bool,
    /// The book is consulted while no more than this many plies have been
    /// played.
    pub book_max_ply: usize,
    /// Seed for the book's random choice. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub eval: EvalWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            use_opening_book: true,
            book_max_ply: 10,
            seed: None,
            eval: EvalWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> ChessResult<Self> {
        let config: Self = serde_json::from_str(json_str)
            .map_err(|e| ChessErrors::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> ChessResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChessErrors::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::load_from_json(&text)
    }

    pub fn to_json(&self) -> ChessResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ChessErrors::InvalidConfig(e.to_string()))
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> ChessResult<()> {
        if !(0..=100).contains(&self.eval.hanging_piece_percent) {
            return Err(ChessErrors::InvalidConfig(format!(
                "hanging_piece_percent must be within 0..=100, got {}",
                self.eval.hanging_piece_percent
            )));
        }
        if self.eval.early_queen_min_developed > 4 {
            return Err(ChessErrors::InvalidConfig(format!(
                "early_queen_min_developed cannot exceed 4, got {}",
                self.eval.early_queen_min_developed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_maps_to_depth_and_cap() {
        let depths: Vec<u8> = (1..=5)
            .map(|l| Difficulty::new(l).expect("valid level").search_depth())
            .collect();
        assert_eq!(depths, vec![1, 1, 2, 3, 4]);
        assert_eq!(Difficulty::new(2).expect("valid").root_move_cap(), Some(10));
        assert_eq!(Difficulty::new(5).expect("valid").root_move_cap(), None);
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(6).is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::load_from_json(
            r#"{ "difficulty": 4, "seed": 7, "eval": { "bishop_pair": 50 } }"#,
        )
        .expect("config should parse");
        assert_eq!(config.difficulty.level(), 4);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.eval.bishop_pair, 50);
        assert_eq!(config.eval.rook_open_file, 15);
        assert_eq!(config.book_max_ply, 10);
        assert!(config.use_opening_book);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            EngineConfig::load_from_json(r#"{ "difficulty": 9 }"#),
            Err(ChessErrors::InvalidConfig(_))
        ));
        assert!(EngineConfig::load_from_json(r#"{ "eval": { "hanging_piece_percent": 300 } }"#)
            .is_err());
        assert!(EngineConfig::load_from_json("not json").is_err());
    }

    #[test]
    fn json_round_trip() {
        let config = EngineConfig::default().with_seed(11);
        let text = config.to_json().expect("config should serialize");
        assert_eq!(
            EngineConfig::load_from_json(&text).expect("config should parse"),
            config
        );
    }
}
