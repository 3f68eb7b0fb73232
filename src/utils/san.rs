//! Standard algebraic notation (SAN).
//!
//! SAN text is always relative to the position before the move. Generation
//! disambiguates by file, then rank, then both, and appends `+` or `#`.
//! Parsing matches the normalized token against the SAN of every legal move,
//! so it accepts exactly what generation produces plus common looseness
//! (missing `=` before a promotion piece, `0-0` castles, check or
//! annotation suffixes).

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_legal_move};
use crate::moves::chess_move::{Move, FLAG_KINGSIDE_CASTLE};
use crate::utils::algebraic::{file_char, rank_char, square_to_algebraic};

pub fn move_to_san(position: &Position, mv: Move) -> String {
    let mut scratch = position.clone();
    let legal = generate_legal_moves(&mut scratch);
    let mut san = san_without_suffix(position, mv, &legal);

    let mut after = scratch.scoped_move(mv);
    let defender = after.side_to_move;
    if is_king_in_check(&after, defender) {
        san.push(if has_legal_move(&mut after) { '+' } else { '#' });
    }
    san
}

pub fn parse_san(text: &str, position: &Position) -> ChessResult<Move> {
    let wanted = normalize(text);
    if wanted.is_empty() {
        return Err(ChessErrors::notation(format!("empty SAN token: {text:?}")));
    }

    let mut scratch = position.clone();
    let legal = generate_legal_moves(&mut scratch);
    let mut matches = legal
        .iter()
        .copied()
        .filter(|&mv| normalize(&san_without_suffix(position, mv, &legal)) == wanted);

    match (matches.next(), matches.next()) {
        (Some(mv), None) => Ok(mv),
        (Some(_), Some(_)) => Err(ChessErrors::notation(format!("ambiguous SAN move: {text}"))),
        (None, _) => Err(ChessErrors::illegal(
            text.to_owned(),
            "no legal move matches this SAN",
        )),
    }
}

fn san_without_suffix(position: &Position, mv: Move, legal: &[Move]) -> String {
    if mv.is_castle() {
        return if mv.has_flag(FLAG_KINGSIDE_CASTLE) {
            "O-O".to_owned()
        } else {
            "O-O-O".to_owned()
        };
    }

    let mut out = String::with_capacity(7);
    if mv.piece == PieceKind::Pawn {
        if mv.is_capture() {
            out.push(file_char(mv.from));
            out.push('x');
        }
        out.push_str(&square_to_algebraic(mv.to));
        if let Some(promo) = mv.promotion {
            out.push('=');
            out.push(promo.letter());
        }
        return out;
    }

    out.push(mv.piece.letter());
    out.push_str(&disambiguation(position, mv, legal));
    if mv.is_capture() {
        out.push('x');
    }
    out.push_str(&square_to_algebraic(mv.to));
    out
}

fn disambiguation(position: &Position, mv: Move, legal: &[Move]) -> String {
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|other| {
            other.piece == mv.piece
                && other.to == mv.to
                && other.from != mv.from
                && position.piece_at(other.from) == position.piece_at(mv.from)
        })
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|&sq| file_of(sq) != file_of(mv.from)) {
        return file_char(mv.from).to_string();
    }
    if rivals.iter().all(|&sq| rank_of(sq) != rank_of(mv.from)) {
        return rank_char(mv.from).to_string();
    }
    square_to_algebraic(mv.from)
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
        .trim_end_matches("e.p.")
        .trim()
        .replace('0', "O")
        .replace('=', "")
}
