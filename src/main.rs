use std::io::{self, BufRead, Write};

use log::{error, info};

use chess_tutor::chess_errors::ChessErrors;
use chess_tutor::config::{Difficulty, EngineConfig};
use chess_tutor::engines::engine_trait::{Engine, EngineDecision, MoveSource};
use chess_tutor::engines::tutor_engine::TutorEngine;
use chess_tutor::game_state::chess_types::Color;
use chess_tutor::game_state::game_session::GameSession;
use chess_tutor::utils::render_game_state::render_position;

const HELP: &str = "\
moves: e2e4, e7e8q or SAN such as Nf3, O-O
commands:
  new [white|black]  start a new game playing the given side
  undo               take back your last move and the reply
  fen <FEN>          continue from a position
  show               print the board
  level <1-5>        change the computer's strength
  pgn                print the game so far
  quit";

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Chess(#[from] ChessErrors),
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

type CommandResult<T> = Result<T, CommandError>;

struct Tutor {
    session: GameSession,
    engine: TutorEngine,
    human: Color,
}

impl Tutor {
    fn new(config: EngineConfig) -> Self {
        Self {
            session: GameSession::new_game(),
            engine: TutorEngine::new(config),
            human: Color::White,
        }
    }

    fn show(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", render_position(self.session.position()))?;
        writeln!(out, "{}", self.session.position().to_fen())?;
        let status = self.session.status();
        if status.is_over() {
            writeln!(out, "game over: {status}")?;
        } else if self.session.is_in_check() {
            writeln!(out, "check")?;
        }
        Ok(())
    }

    /// Let the computer move while it is its turn.
    fn reply(&mut self, out: &mut impl Write) -> CommandResult<()> {
        if self.session.status().is_over() || self.session.side_to_move() == self.human {
            return Ok(());
        }
        let history = self.session.history();
        match self.engine.choose_move(self.session.position(), &history)? {
            EngineDecision::Move { mv, source } => {
                let record = self.session.play_move(mv)?;
                let how = match source {
                    MoveSource::Book => "book".to_owned(),
                    MoveSource::Search { depth, score, .. } => {
                        format!("depth {depth}, score {score}")
                    }
                };
                writeln!(out, "computer plays {} ({how})", record.san)?;
            }
            EngineDecision::GameOver(status) => {
                writeln!(out, "game over: {status}")?;
            }
        }
        Ok(())
    }

    fn handle(&mut self, line: &str, out: &mut impl Write) -> CommandResult<bool> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(true);
        };

        match command {
            "quit" | "exit" => return Ok(false),
            "help" => {
                writeln!(out, "{HELP}")?;
            }
            "show" => {
                self.show(out)?;
            }
            "new" => {
                self.human = match words.next() {
                    Some("black") => Color::Black,
                    _ => Color::White,
                };
                self.session.reset();
                self.engine.new_game();
                self.reply(out)?;
                self.show(out)?;
            }
            "fen" => {
                let fen = words.collect::<Vec<_>>().join(" ");
                self.session.load_fen(&fen)?;
                self.human = self.session.side_to_move();
                self.show(out)?;
            }
            "level" => {
                let level = words
                    .next()
                    .and_then(|w| w.parse::<u8>().ok())
                    .unwrap_or(0);
                let difficulty = Difficulty::new(level)?;
                self.engine.set_difficulty(difficulty);
                writeln!(out, "level {difficulty}")?;
            }
            "undo" => {
                self.session.undo_last()?;
                if self.session.side_to_move() != self.human && self.session.ply_count() > 0 {
                    self.session.undo_last()?;
                }
                self.show(out)?;
            }
            "pgn" => {
                let (white, black) = match self.human {
                    Color::White => ("Player", self.engine.name()),
                    Color::Black => (self.engine.name(), "Player"),
                };
                write!(out, "{}", self.session.to_pgn(white, black))?;
            }
            _ => {
                let record = self.session.try_move_text(line.trim())?;
                if let Some(quality) = self.session.assess_last_move(self.engine.scorer()) {
                    writeln!(
                        out,
                        "you played {}: {} ({}/100)",
                        record.san, quality.rating, quality.score
                    )?;
                }
                self.reply(out)?;
                self.show(out)?;
            }
        }
        Ok(true)
    }
}

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                std::process::exit(2);
            }
        },
        None => EngineConfig::default(),
    };
    info!("starting at difficulty {}", config.difficulty);

    let mut tutor = Tutor::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if writeln!(out, "{HELP}").and_then(|()| tutor.show(&mut out)).is_err() {
        return;
    }

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        match tutor.handle(&line, &mut out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(CommandError::Chess(e)) => {
                if writeln!(out, "{e}").is_err() {
                    break;
                }
            }
            Err(e @ CommandError::Io(_)) => {
                error!("{e}");
                break;
            }
        }
        if out.flush().is_err() {
            break;
        }
    }
}
