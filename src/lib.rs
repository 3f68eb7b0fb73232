//! Crate root module declarations for the chess tutor.
//!
//! This file exposes the rules engine (game state, move generation,
//! terminal-state detection), the computer opponent (search, evaluation,
//! opening book) and the notation helpers so the terminal front end, tests
//! and benchmarks can import stable module paths.

pub mod chess_errors;
pub mod config;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_session;
    pub mod game_status;
    pub mod position;
    pub mod undo_state;
}

pub mod moves {
    pub mod attack_tables;
    pub mod chess_move;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod perft;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod move_ordering;
    pub mod move_quality;
    pub mod zobrist;
}

pub mod tables {
    pub mod opening_book;
    pub mod piece_square_tables;
}

pub mod engines {
    pub mod engine_trait;
    pub mod tutor_engine;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}
