//! Engine abstraction for choosing the computer's move.
//!
//! The session and the terminal front end only talk to `Engine`, so a
//! stronger or weaker opponent can be swapped in without touching them.

use crate::chess_errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::game_state::game_status::GameStatus;
use crate::moves::chess_move::Move;

/// Where a chosen move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Book,
    Search { depth: u8, score: i32, nodes: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineDecision {
    Move { mv: Move, source: MoveSource },
    /// The position is terminal; no move is played.
    GameOver(GameStatus),
}

impl EngineDecision {
    pub fn best_move(&self) -> Option<Move> {
        match self {
            EngineDecision::Move { mv, .. } => Some(*mv),
            EngineDecision::GameOver(_) => None,
        }
    }
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    /// Pick a move for the side to move. `history` lists the moves played
    /// since the start of the game and is only used for book lookup.
    fn choose_move(&mut self, position: &Position, history: &[Move])
        -> ChessResult<EngineDecision>;
}
