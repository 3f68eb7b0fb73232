//! PGN read/write utilities for game history interchange.
//!
//! Writes the Seven Tag Roster plus `SetUp`/`FEN` for games that did not
//! start from the standard position, with SAN movetext. Reading accepts SAN
//! and, as a fallback, long algebraic tokens.

use chrono::{Local, NaiveDate};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::san::{move_to_san, parse_san};

pub type PgnHeaders = Vec<(String, String)>;

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: PgnHeaders,
    pub initial_position: Position,
    pub moves: Vec<Move>,
    pub final_position: Position,
    pub result: String,
}

impl PgnGame {
    pub fn header(&self, key: &str) -> Option<&str> {
        header_value(&self.headers, key)
    }
}

/// Seven Tag Roster for a game played today.
pub fn default_headers(initial: &Position, white: &str, black: &str, result: &str) -> PgnHeaders {
    headers_for_date(initial, white, black, result, Local::now().date_naive())
}

pub fn headers_for_date(
    initial: &Position,
    white: &str,
    black: &str,
    result: &str,
    date: NaiveDate,
) -> PgnHeaders {
    let mut headers: PgnHeaders = vec![
        ("Event".to_owned(), "Casual Game".to_owned()),
        ("Site".to_owned(), "Local".to_owned()),
        ("Date".to_owned(), date.format("%Y.%m.%d").to_string()),
        ("Round".to_owned(), "-".to_owned()),
        ("White".to_owned(), white.to_owned()),
        ("Black".to_owned(), black.to_owned()),
        ("Result".to_owned(), normalize_result(result).to_owned()),
    ];

    let initial_fen = initial.to_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.push(("SetUp".to_owned(), "1".to_owned()));
        headers.push(("FEN".to_owned(), initial_fen));
    }
    headers
}

pub fn write_pgn(initial: &Position, moves: &[Move], headers: &PgnHeaders) -> String {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut position = initial.clone();
    let mut parts = Vec::<String>::with_capacity(moves.len() + 1);
    for (ply, mv) in moves.iter().enumerate() {
        let san = move_to_san(&position, *mv);
        if ply == 0 && position.side_to_move == Color::Black {
            parts.push(format!("{}... {}", position.fullmove_number, san));
        } else if position.side_to_move == Color::White {
            parts.push(format!("{}. {}", position.fullmove_number, san));
        } else {
            parts.push(san);
        }
        position.make_move(*mv);
    }

    let result = header_value(headers, "Result")
        .map(normalize_result)
        .unwrap_or("*");
    parts.push(result.to_owned());
    out.push_str(&parts.join(" "));
    out.push('\n');

    out
}

pub fn read_pgn(pgn: &str) -> ChessResult<PgnGame> {
    let mut headers = PgnHeaders::new();
    let mut movetext_lines = Vec::<&str>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('[') {
            headers.push(parse_header_line(trimmed)?);
        } else {
            movetext_lines.push(trimmed);
        }
    }

    let initial_position = if header_value(&headers, "SetUp") == Some("1") {
        let fen = header_value(&headers, "FEN").ok_or_else(|| {
            ChessErrors::notation("PGN SetUp=1 is present but FEN header is missing")
        })?;
        Position::from_fen(fen)?
    } else {
        Position::new_game()
    };

    let mut position = initial_position.clone();
    let mut moves = Vec::<Move>::new();
    let mut result = "*".to_owned();

    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    for token in movetext.split_whitespace() {
        let token = strip_move_number(token);
        if token.is_empty() || token.starts_with('$') {
            continue;
        }
        if is_result_token(token) {
            result = token.to_owned();
            break;
        }

        let mv = parse_san(token, &position).or_else(|san_err| {
            parse_long_algebraic(token, &position).map_err(|_| san_err)
        })?;
        position.make_move(mv);
        moves.push(mv);
    }

    if let Some(header_result) = header_value(&headers, "Result") {
        result = normalize_result(header_result).to_owned();
    }

    Ok(PgnGame {
        headers,
        initial_position,
        moves,
        final_position: position,
        result,
    })
}

fn header_value<'a>(headers: &'a PgnHeaders, key: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_header_line(line: &str) -> ChessResult<(String, String)> {
    let invalid = || ChessErrors::notation(format!("invalid PGN header line: {line}"));
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (key, value_raw) = inner.split_once(' ').ok_or_else(invalid)?;
    let value = value_raw
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(invalid)?;
    Ok((key.trim().to_owned(), value.replace("\\\"", "\"")))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::new();
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' => paren_depth = paren_depth.saturating_add(1),
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// `12.e4` / `12...e5` / `12.` to the move part, possibly empty.
fn strip_move_number(token: &str) -> &str {
    let digits = token.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && token[digits..].starts_with('.') {
        token[digits..].trim_start_matches('.')
    } else {
        token
    }
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}
