//! Move classification and coordinate notation.

use crate::{Square, SquareError};
use std::fmt;
use std::str::FromStr;

/// Special-rule classification of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Ordinary move or capture.
    Normal = 0,
    /// Pawn double step from its starting rank.
    DoublePawnStep = 1,
    /// Pawn capture onto the en passant target.
    EnPassantCapture = 2,
    /// Kingside castling (O-O).
    ShortCastle = 3,
    /// Queenside castling (O-O-O).
    LongCastle = 4,
    /// Pawn reaching the far rank; always becomes a queen.
    Promotion = 5,
}

impl MoveKind {
    /// Returns true for either castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveKind::ShortCastle | MoveKind::LongCastle)
    }
}

/// A move as an origin/destination pair, e.g. `e2e4`.
///
/// This is the form external engines answer in. A trailing promotion letter
/// (`e7e8q`) is accepted and ignored since promotion is always to a queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordMove {
    pub from: Square,
    pub to: Square,
}

impl CoordMove {
    pub const fn new(from: Square, to: Square) -> Self {
        CoordMove { from, to }
    }
}

impl FromStr for CoordMove {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid_len = s.len() == 4
            || (s.len() == 5 && matches!(s.as_bytes()[4].to_ascii_lowercase(), b'q'));
        if !valid_len || !s.is_ascii() {
            return Err(SquareError::InvalidName(s.to_string()));
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        Ok(CoordMove { from, to })
    }
}

impl fmt::Display for CoordMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_kinds() {
        assert!(MoveKind::ShortCastle.is_castling());
        assert!(MoveKind::LongCastle.is_castling());
        assert!(!MoveKind::Normal.is_castling());
        assert!(!MoveKind::Promotion.is_castling());
    }

    #[test]
    fn parse_coordinate_move() {
        let m: CoordMove = "e2e4".parse().unwrap();
        assert_eq!(m.from, Square::new(4, 1));
        assert_eq!(m.to, Square::new(4, 3));
        assert_eq!(m.to_string(), "e2e4");

        let promo: CoordMove = "a7a8q".parse().unwrap();
        assert_eq!(promo.to, Square::A8);
    }

    #[test]
    fn reject_malformed_coordinate_moves() {
        assert!("e2".parse::<CoordMove>().is_err());
        assert!("e2e9".parse::<CoordMove>().is_err());
        assert!("e7e8n".parse::<CoordMove>().is_err());
        assert!("e2e4e5".parse::<CoordMove>().is_err());
        assert!("(none)".parse::<CoordMove>().is_err());
    }
}
