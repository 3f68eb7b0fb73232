//! One game as the player sees it.
//!
//! `GameSession` owns the current position together with the moves that led
//! to it. Every request is validated before anything changes: a rejected
//! move, a move after the game ended, or an undo with nothing played leaves
//! the session exactly as it was. The terminal-state detector runs after
//! every applied move and after every undo.

use log::info;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_status::{classify_in_place, GameStatus};
use crate::move_generation::legal_move_apply::find_legal_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_quality::{assess_move, MoveQuality};
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::pgn::{default_headers, write_pgn};
use crate::utils::san::{move_to_san, parse_san};

/// Outcome of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub san: String,
    pub status: GameStatus,
}

#[derive(Debug, Clone)]
struct PlayedMove {
    san: String,
    undo: UndoState,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    initial: Position,
    position: Position,
    played: Vec<PlayedMove>,
    status: GameStatus,
}

impl GameSession {
    pub fn new_game() -> Self {
        Self::starting_from(Position::new_game())
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Ok(Self::starting_from(Position::from_fen(fen)?))
    }

    fn starting_from(mut position: Position) -> Self {
        let status = classify_in_place(&mut position);
        info!("new game from {} ({status})", position.to_fen());
        Self {
            initial: position.clone(),
            position,
            played: Vec::new(),
            status,
        }
    }

    /// Back to the standard starting position.
    pub fn reset(&mut self) {
        *self = Self::new_game();
    }

    /// Replace the game with one starting from `fen`. On error the current
    /// game is kept.
    pub fn load_fen(&mut self, fen: &str) -> ChessResult<()> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn initial_position(&self) -> &Position {
        &self.initial
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn is_in_check(&self) -> bool {
        is_king_in_check(&self.position, self.position.side_to_move)
    }

    pub fn history(&self) -> Vec<Move> {
        self.played.iter().map(|p| p.undo.mv).collect()
    }

    pub fn san_history(&self) -> Vec<&str> {
        self.played.iter().map(|p| p.san.as_str()).collect()
    }

    pub fn ply_count(&self) -> usize {
        self.played.len()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.status.is_over() {
            return Vec::new();
        }
        legal_moves(&self.position)
    }

    /// Legal destinations for the piece on `from`, for move highlighting.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from)
            .collect()
    }

    /// Submit a move as squares. A pawn reaching the last rank without a
    /// promotion piece becomes a queen.
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<MoveRecord> {
        self.ensure_ongoing()?;
        let mv = find_legal_move(&self.position, from, to, promotion)?;
        Ok(self.play(mv))
    }

    /// Submit a move as long algebraic (`e2e4`, `e7e8n`) or SAN (`Nf3`).
    pub fn try_move_text(&mut self, text: &str) -> ChessResult<MoveRecord> {
        self.ensure_ongoing()?;
        let mv = match parse_long_algebraic(text, &self.position) {
            Ok(mv) => mv,
            Err(lan_err) => parse_san(text, &self.position).map_err(|san_err| {
                match san_err {
                    ChessErrors::InvalidNotation(_) => lan_err,
                    other => other,
                }
            })?,
        };
        Ok(self.play(mv))
    }

    /// Play a move that came from an engine or another trusted source. It is
    /// still checked against the legal move list.
    pub fn play_move(&mut self, mv: Move) -> ChessResult<MoveRecord> {
        self.ensure_ongoing()?;
        if !legal_moves(&self.position).contains(&mv) {
            return Err(ChessErrors::illegal(
                mv.to_long_algebraic(),
                "not a legal move in this position",
            ));
        }
        Ok(self.play(mv))
    }

    /// Take back the last move, reopening a finished game if needed.
    pub fn undo_last(&mut self) -> ChessResult<Move> {
        let played = self.played.pop().ok_or(ChessErrors::NothingToUndo)?;
        self.position.unmake_move(&played.undo);
        self.status = classify_in_place(&mut self.position);
        info!("took back {}", played.san);
        Ok(played.undo.mv)
    }

    /// Grade the most recent move from the position it was played in.
    pub fn assess_last_move<S: BoardScorer + ?Sized>(&self, scorer: &S) -> Option<MoveQuality> {
        let last = self.played.last()?;
        let mut before = self.position.clone();
        before.unmake_move(&last.undo);
        Some(assess_move(&mut before, last.undo.mv, scorer))
    }

    pub fn to_pgn(&self, white: &str, black: &str) -> String {
        let headers = default_headers(&self.initial, white, black, self.status.result_token());
        write_pgn(&self.initial, &self.history(), &headers)
    }

    fn ensure_ongoing(&self) -> ChessResult<()> {
        if self.status.is_over() {
            Err(ChessErrors::GameAlreadyOver(self.status))
        } else {
            Ok(())
        }
    }

    fn play(&mut self, mv: Move) -> MoveRecord {
        let san = move_to_san(&self.position, mv);
        let undo = self.position.make_move(mv);
        self.status = classify_in_place(&mut self.position);
        if self.status.is_over() {
            info!("game over after {san}: {}", self.status);
        }
        self.played.push(PlayedMove {
            san: san.clone(),
            undo,
        });
        MoveRecord {
            mv,
            san,
            status: self.status,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::board_scoring::MaterialScorer;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    #[test]
    fn accepted_move_reports_san_and_status() {
        let mut session = GameSession::new_game();
        let record = session.try_move(sq("g1"), sq("f3"), None).expect("legal");
        assert_eq!(record.san, "Nf3");
        assert_eq!(record.status, GameStatus::Ongoing);
        assert_eq!(session.side_to_move(), Color::Black);
        assert_eq!(session.san_history(), vec!["Nf3"]);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut session = GameSession::new_game();
        let before = session.position().clone();
        assert!(matches!(
            session.try_move(sq("e2"), sq("e5"), None),
            Err(ChessErrors::IllegalMoveRequested { .. })
        ));
        assert!(session.try_move(sq("e7"), sq("e5"), None).is_err());
        assert!(session.try_move(sq("e4"), sq("e5"), None).is_err());
        assert!(matches!(
            session.try_move(12, 200, None),
            Err(ChessErrors::IllegalMoveRequested { .. })
        ));
        assert_eq!(session.position(), &before);
        assert_eq!(session.ply_count(), 0);
    }

    #[test]
    fn moves_after_mate_are_refused() {
        let mut session = GameSession::new_game();
        for text in ["f3", "e5", "g4", "Qh4"] {
            session.try_move_text(text).expect("legal");
        }
        let mate = GameStatus::Checkmate {
            winner: Color::Black,
        };
        assert_eq!(session.status(), mate);
        assert!(session.legal_moves().is_empty());
        assert_eq!(
            session.try_move(sq("a2"), sq("a3"), None),
            Err(ChessErrors::GameAlreadyOver(mate))
        );
        assert_eq!(session.san_history().last(), Some(&"Qh4#"));

        session.undo_last().expect("a move to undo");
        assert_eq!(session.status(), GameStatus::Ongoing);
    }

    #[test]
    fn undo_restores_the_previous_position() {
        let mut session = GameSession::new_game();
        assert_eq!(session.undo_last(), Err(ChessErrors::NothingToUndo));
        let start = session.position().clone();
        session.try_move_text("e2e4").expect("legal");
        session.try_move_text("d5").expect("legal");
        session.undo_last().expect("undo d5");
        session.undo_last().expect("undo e4");
        assert_eq!(session.position(), &start);
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut session =
            GameSession::from_fen("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let record = session.try_move(sq("e7"), sq("e8"), None).expect("legal");
        assert_eq!(record.mv.promotion, Some(PieceKind::Queen));
        assert_eq!(record.san, "e8=Q");
        session.undo_last().expect("undo");
        let record = session
            .try_move(sq("e7"), sq("e8"), Some(PieceKind::Knight))
            .expect("legal");
        assert_eq!(record.san, "e8=N+");
    }

    #[test]
    fn bad_fen_keeps_the_current_game() {
        let mut session = GameSession::new_game();
        session.try_move_text("e4").expect("legal");
        assert!(matches!(
            session.load_fen("not a fen"),
            Err(ChessErrors::MalformedPositionInput(_))
        ));
        assert_eq!(session.ply_count(), 1);
    }

    #[test]
    fn pgn_and_assessment_cover_the_game() {
        let mut session = GameSession::new_game();
        assert!(session.assess_last_move(&MaterialScorer).is_none());
        for text in ["e4", "d5", "exd5"] {
            session.try_move_text(text).expect("legal");
        }
        let pgn = session.to_pgn("Student", "Tutor");
        assert!(pgn.contains("[White \"Student\"]"));
        assert!(pgn.contains("1. e4 d5 2. exd5 *"));
        let quality = session.assess_last_move(&MaterialScorer).expect("a move was played");
        assert_eq!(quality.eval_after - quality.eval_before, 100);
    }
}
