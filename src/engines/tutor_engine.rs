//! The tutor's computer opponent: opening book first, then a fixed-depth
//! alpha-beta search whose depth and root breadth follow the difficulty.

use log::{debug, info};

use crate::chess_errors::ChessResult;
use crate::config::{Difficulty, EngineConfig};
use crate::engines::engine_trait::{Engine, EngineDecision, MoveSource};
use crate::game_state::chess_types::*;
use crate::game_state::game_status::classify_in_place;
use crate::moves::chess_move::Move;
use crate::search::alpha_beta::{best_move, SearchHints};
use crate::search::board_scoring::TutorScorer;
use crate::tables::opening_book::{BookStrategy, OpeningBook, SeededRandomBook};

pub struct TutorEngine {
    config: EngineConfig,
    book: OpeningBook,
    strategy: Box<dyn BookStrategy>,
    scorer: TutorScorer,
}

impl TutorEngine {
    pub fn new(config: EngineConfig) -> Self {
        let strategy = Box::new(SeededRandomBook::from_optional_seed(config.seed));
        let scorer = TutorScorer::new(config.eval.clone());
        Self {
            config,
            book: OpeningBook::load_default(),
            strategy,
            scorer,
        }
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn BookStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &TutorScorer {
        &self.scorer
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!("difficulty set to {difficulty}");
        self.config.difficulty = difficulty;
    }

    fn book_move(&mut self, position: &Position, history: &[Move]) -> Option<Move> {
        if !self.config.use_opening_book || history.len() > self.config.book_max_ply {
            return None;
        }
        let candidates = self.book.legal_candidates(position, history);
        debug!("{} legal book candidates", candidates.len());
        self.strategy.choose(&candidates)
    }
}

impl Default for TutorEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine for TutorEngine {
    fn name(&self) -> &str {
        "Chess Tutor"
    }

    fn new_game(&mut self) {
        info!("engine ready for a new game at difficulty {}", self.config.difficulty);
    }

    fn choose_move(
        &mut self,
        position: &Position,
        history: &[Move],
    ) -> ChessResult<EngineDecision> {
        let mut scratch = position.clone();
        let status = classify_in_place(&mut scratch);
        if status.is_over() {
            info!("no move to make: {status}");
            return Ok(EngineDecision::GameOver(status));
        }

        if let Some(mv) = self.book_move(position, history) {
            info!("book move {mv}");
            return Ok(EngineDecision::Move {
                mv,
                source: MoveSource::Book,
            });
        }

        let difficulty = self.config.difficulty;
        let hints = SearchHints {
            root_move_cap: difficulty.root_move_cap(),
        };
        let result = best_move(&mut scratch, difficulty.search_depth(), &hints, &self.scorer);

        match result.best_move {
            Some(mv) => {
                info!(
                    "searched move {mv} (depth {}, score {}, {} nodes)",
                    result.depth, result.score, result.nodes
                );
                Ok(EngineDecision::Move {
                    mv,
                    source: MoveSource::Search {
                        depth: result.depth,
                        score: result.score,
                        nodes: result.nodes,
                    },
                })
            }
            None => Ok(EngineDecision::GameOver(classify_in_place(&mut scratch))),
        }
    }
}
