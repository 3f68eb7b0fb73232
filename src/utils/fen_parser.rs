//! FEN-to-Position parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string
//! and rejects structurally invalid input as a whole: nothing is returned
//! unless every field parses and the board passes the king and pawn checks.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| missing("board layout"))?;
    let side_part = parts.next().ok_or_else(|| missing("side-to-move"))?;
    let castling_part = parts.next().ok_or_else(|| missing("castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| missing("en-passant square"))?;
    let halfmove_part = parts.next().ok_or_else(|| missing("halfmove clock"))?;
    let fullmove_part = parts.next().ok_or_else(|| missing("fullmove number"))?;

    if parts.next().is_some() {
        return Err(ChessErrors::malformed("FEN has extra trailing fields"));
    }

    let mut position = Position::new_empty();

    parse_board(board_part, &mut position)?;
    validate_board(&position)?;
    position.side_to_move = parse_side_to_move(side_part)?;
    position.castling_rights = parse_castling_rights(castling_part)?;
    position.en_passant_square = parse_en_passant_square(en_passant_part, position.side_to_move)?;
    position.halfmove_clock = halfmove_part.parse::<u16>().map_err(|_| {
        ChessErrors::malformed(format!("invalid halfmove clock: {halfmove_part}"))
    })?;
    position.fullmove_number = fullmove_part.parse::<u16>().map_err(|_| {
        ChessErrors::malformed(format!("invalid fullmove number: {fullmove_part}"))
    })?;

    position.refresh_zobrist_key();
    Ok(position)
}

fn missing(field: &str) -> ChessErrors {
    ChessErrors::malformed(format!("missing {field} in FEN"))
}

fn parse_board(board_part: &str, position: &mut Position) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessErrors::malformed(format!(
            "board layout must contain 8 ranks, found {}",
            ranks.len()
        )));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessErrors::malformed(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as u8;
                if file > 8 {
                    break;
                }
                continue;
            }

            let piece = piece_from_fen_char(ch).ok_or_else(|| {
                ChessErrors::malformed(format!("invalid piece character '{ch}' in board layout"))
            })?;

            if file >= 8 {
                return Err(ChessErrors::malformed(format!(
                    "rank {} has too many files",
                    board_rank + 1
                )));
            }

            position.place_piece(square_at(file, board_rank), piece);
            file += 1;
        }

        if file != 8 {
            return Err(ChessErrors::malformed(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    Ok(())
}

fn validate_board(position: &Position) -> ChessResult<()> {
    for color in [Color::White, Color::Black] {
        let kings = position.pieces_of(color, PieceKind::King).count_ones();
        if kings != 1 {
            return Err(ChessErrors::malformed(format!(
                "expected exactly one {color:?} king, found {kings}"
            )));
        }
    }

    let back_ranks = 0xFF00_0000_0000_00FFu64;
    let pawns = position.pieces_of(Color::White, PieceKind::Pawn)
        | position.pieces_of(Color::Black, PieceKind::Pawn);
    if pawns & back_ranks != 0 {
        return Err(ChessErrors::malformed("pawn on the first or eighth rank"));
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessErrors::malformed(format!(
            "invalid side-to-move field: {side_part}"
        ))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_WHITE_KINGSIDE,
            'Q' => rights |= CASTLE_WHITE_QUEENSIDE,
            'k' => rights |= CASTLE_BLACK_KINGSIDE,
            'q' => rights |= CASTLE_BLACK_QUEENSIDE,
            _ => {
                return Err(ChessErrors::malformed(format!(
                    "invalid castling rights character: {ch}"
                )))
            }
        }
    }

    Ok(rights)
}

/// The target must lie behind a pawn that just advanced two squares: rank 6
/// when white is to move, rank 3 when black is.
fn parse_en_passant_square(en_passant_part: &str, side: Color) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|e| ChessErrors::malformed(format!("invalid en-passant square: {e}")))?;
    let expected_rank = match side {
        Color::White => 5,
        Color::Black => 2,
    };
    if rank_of(square) != expected_rank {
        return Err(ChessErrors::malformed(format!(
            "en-passant square {en_passant_part} is on the wrong rank"
        )));
    }
    Ok(Some(square))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    PieceKind::from_letter(ch).map(|kind| Piece::new(kind, color))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;

    #[test]
    fn parse_starting_fen() {
        let position = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(position, Position::new_game());
        assert_eq!(position.side_to_move, Color::White);
        assert_eq!(position.fullmove_number, 1);
        assert_eq!(position.halfmove_clock, 0);
    }

    #[test]
    fn rejects_structural_errors() {
        let cases = [
            "rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkx - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKKNR w KQkq - 0 1",
            "Pnbqkbnr/pppppppp/8/8/8/8/1PPPPPPP/RNBQKBNR w KQkq - 0 1",
        ];
        for fen in cases {
            let err = parse_fen(fen).expect_err(fen);
            assert!(matches!(err, ChessErrors::MalformedPositionInput(_)), "{fen}");
        }
    }

    #[test]
    fn en_passant_square_matches_side_to_move() {
        let position = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .expect("FEN should parse");
        assert_eq!(position.en_passant_square, Some(20));
        assert!(parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1").is_err());
    }
}
