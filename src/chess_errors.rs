//! Errors used throughout the tutor core.
//!
//! `ChessErrors` is the single error type returned by parsing, move
//! validation, session handling and configuration loading. Every variant is
//! local and recoverable: the operation that produced it leaves the game state
//! exactly as it was before the call.
//!
//! Running out of legal moves is not an error. Search reports it through an
//! empty `best_move` and callers consult the terminal-state detector.

use thiserror::Error;

use crate::game_state::game_status::GameStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessErrors {
    /// The move fails the legality filter, names an off-board square, or
    /// moves a piece the side to move does not own.
    #[error("illegal move {requested}: {reason}")]
    IllegalMoveRequested { requested: String, reason: String },

    /// A serialized position failed structural validation.
    #[error("malformed position input: {0}")]
    MalformedPositionInput(String),

    /// A square, long-algebraic or SAN token could not be parsed.
    #[error("invalid notation: {0}")]
    InvalidNotation(String),

    /// A move was submitted after the game reached a terminal state.
    #[error("game is already over ({0})")]
    GameAlreadyOver(GameStatus),

    /// Configuration text failed to parse or validate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no move to undo")]
    NothingToUndo,
}

impl ChessErrors {
    pub(crate) fn illegal(requested: impl Into<String>, reason: impl Into<String>) -> Self {
        ChessErrors::IllegalMoveRequested {
            requested: requested.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ChessErrors::MalformedPositionInput(message.into())
    }

    pub(crate) fn notation(message: impl Into<String>) -> Self {
        ChessErrors::InvalidNotation(message.into())
    }
}

pub type ChessResult<T> = Result<T, ChessErrors>;

#[cfg(test)]
mod tests {
    use super::ChessErrors;

    #[test]
    fn illegal_move_message_names_move_and_reason() {
        let err = ChessErrors::illegal("e2e5", "no such move for the pawn on e2");
        assert_eq!(
            err.to_string(),
            "illegal move e2e5: no such move for the pawn on e2"
        );
    }
}
