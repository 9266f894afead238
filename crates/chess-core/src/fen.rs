//! FEN (Forsyth-Edwards Notation) field parsing.

use crate::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors that can occur when parsing position text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
    MissingFields(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("unknown piece symbol '{symbol}' in rank {rank}")]
    UnknownSymbol { symbol: char, rank: u8 },

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("expected exactly one {0} king")]
    KingCount(Color),
}

/// Validated FEN fields.
///
/// Holds the placement as a rank-major list of squares so the engine can
/// build its own board from it without re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Occupied squares with their piece, in text order (rank 8 to rank 1).
    pub placement: Vec<(Square, PieceKind, Color)>,
    /// Side to move.
    pub active_color: Color,
    /// Castling availability (e.g. "KQkq", "-").
    pub castling: String,
    /// En passant target square, if any.
    pub en_passant: Option<Square>,
    /// Halfmove clock (for the fifty-move rule); `0` when omitted.
    pub halfmove_clock: u32,
    /// Fullmove number; `1` when omitted.
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    ///
    /// The two move counters are optional; every other field is required.
    pub fn parse(fen: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(ParseError::MissingFields(parts.len()));
        }

        let placement = Self::parse_piece_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ParseError::InvalidActiveColor(other.to_string())),
        };

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = Self::parse_en_passant(parts[3])?;

        let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
            let halfmove = parts[4]
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidHalfmoveClock(parts[4].to_string()))?;
            let fullmove = parts[5]
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ParseError::InvalidFullmoveNumber(parts[5].to_string()))?;
            (halfmove, fullmove)
        } else {
            (0, 1)
        };

        Ok(FenParser {
            placement,
            active_color,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_piece_placement(placement: &str) -> Result<Vec<(Square, PieceKind, Color)>, ParseError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ParseError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut pieces = Vec::with_capacity(32);
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u32;
            for c in row.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += run;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if file < 8 {
                        pieces.push((Square::new(file as u8, rank), kind, color));
                    }
                    file += 1;
                } else {
                    return Err(ParseError::UnknownSymbol {
                        symbol: c,
                        rank: rank + 1,
                    });
                }
            }
            if file != 8 {
                return Err(ParseError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }

        Ok(pieces)
    }

    fn validate_castling(castling: &str) -> Result<(), ParseError> {
        if castling == "-" {
            return Ok(());
        }

        let mut seen = String::new();
        for c in castling.chars() {
            if !"KQkq".contains(c) || seen.contains(c) {
                return Err(ParseError::InvalidCastlingRights(castling.to_string()));
            }
            seen.push(c);
        }

        Ok(())
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, ParseError> {
        if ep == "-" {
            return Ok(None);
        }

        let square = Square::from_algebraic(ep)
            .map_err(|_| ParseError::InvalidEnPassantSquare(ep.to_string()))?;
        if square.rank() != 2 && square.rank() != 5 {
            return Err(ParseError::InvalidEnPassantSquare(ep.to_string()));
        }

        Ok(Some(square))
    }
}

impl Default for FenParser {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.placement.len(), 32);
        assert_eq!(fen.active_color, Color::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn placement_is_rank_major_from_rank_8() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.placement[0], (Square::A8, PieceKind::Rook, Color::Black));
        assert_eq!(
            fen.placement[31],
            (Square::H1, PieceKind::Rook, Color::White)
        );
    }

    #[test]
    fn counters_are_optional() {
        let fen = FenParser::parse("8/8/8/8/8/8/8/4K2k b - -").unwrap();
        assert_eq!(fen.active_color, Color::Black);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn parse_en_passant_target() {
        let fen = FenParser::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .unwrap();
        assert_eq!(fen.en_passant, Some(Square::new(4, 2)));
    }

    #[test]
    fn missing_fields() {
        assert_eq!(
            FenParser::parse("invalid"),
            Err(ParseError::MissingFields(1))
        );
        assert_eq!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0"),
            Err(ParseError::MissingFields(5))
        );
    }

    #[test]
    fn invalid_rank_count() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8 w KQkq - 0 1"),
            Err(ParseError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn unknown_symbol() {
        assert_eq!(
            FenParser::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(ParseError::UnknownSymbol {
                symbol: 'X',
                rank: 2
            })
        );
    }

    #[test]
    fn wrong_square_count() {
        assert!(matches!(
            FenParser::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(ParseError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            FenParser::parse("rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(ParseError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_side_castling_and_counters() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(ParseError::InvalidActiveColor(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(ParseError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(ParseError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(ParseError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(ParseError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(ParseError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn error_messages_mention_offending_input() {
        let err = ParseError::InvalidActiveColor("x".to_string());
        assert!(err.to_string().contains('x'));
        let err = ParseError::KingCount(Color::Black);
        assert!(err.to_string().contains("Black"));
    }
}
