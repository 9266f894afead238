//! Board square representation.

use std::fmt;
use thiserror::Error;

/// Errors raised when a coordinate falls outside the board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("invalid square: file {file}, rank {rank} (both must be in 0..8)")]
    InvalidSquare { file: i32, rank: i32 },

    #[error("invalid square name: '{0}'")]
    InvalidName(String),
}

/// A square on the board, identified by its `(file, rank)` pair.
///
/// Stored as a single index in little-endian rank-file order:
/// a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from file and rank, both in `0..8`.
    ///
    /// Out-of-range values are a logic error; use [`Square::try_new`] at
    /// input boundaries.
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    /// Creates a square, rejecting coordinates outside `0..8`.
    pub fn try_new(file: i32, rank: i32) -> Result<Self, SquareError> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Ok(Square::new(file as u8, rank as u8))
        } else {
            Err(SquareError::InvalidSquare { file, rank })
        }
    }

    /// Creates a square from index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g. "e4").
    pub fn from_algebraic(s: &str) -> Result<Self, SquareError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareError::InvalidName(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(SquareError::InvalidName(s.to_string()));
        }
        Ok(Square::new(file - b'a', rank - b'1'))
    }

    /// Returns the algebraic name of this square (e.g. "e4").
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), (b'1' + self.rank()) as char)
    }

    /// Returns the index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the file (0 = a, 7 = h).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Returns the rank (0 = rank 1, 7 = rank 8).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Returns the file letter.
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    /// Returns the square shifted by the given deltas, if it stays on the board.
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// Returns the same square seen from the other side (rank mirrored).
    #[inline]
    pub const fn flip_rank(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Iterates over all 64 squares from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_new() {
        let e4 = Square::new(4, 3);
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.rank(), 3);
        assert_eq!(e4.index(), 28);
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert_eq!(Square::try_new(0, 0), Ok(Square::A1));
        assert_eq!(Square::try_new(7, 7), Ok(Square::H8));
        assert_eq!(
            Square::try_new(8, 0),
            Err(SquareError::InvalidSquare { file: 8, rank: 0 })
        );
        assert!(Square::try_new(-1, 3).is_err());
        assert!(Square::try_new(3, 8).is_err());
    }

    #[test]
    fn algebraic_names() {
        assert_eq!(Square::from_algebraic("a1"), Ok(Square::A1));
        assert_eq!(Square::from_algebraic("e4"), Ok(Square::new(4, 3)));
        assert_eq!(Square::from_algebraic("H8"), Ok(Square::H8));
        assert!(Square::from_algebraic("i1").is_err());
        assert!(Square::from_algebraic("a9").is_err());
        assert!(Square::from_algebraic("").is_err());
        assert_eq!(Square::A1.to_algebraic(), "a1");
        assert_eq!(Square::new(4, 3).to_algebraic(), "e4");
    }

    #[test]
    fn offsets_stay_on_board() {
        assert_eq!(Square::A1.offset(1, 2), Some(Square::new(1, 2)));
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::E1.offset(0, 7), Some(Square::E8));
    }

    #[test]
    fn flip_rank_mirrors_vertically() {
        assert_eq!(Square::A1.flip_rank(), Square::A8);
        assert_eq!(Square::new(4, 1).flip_rank(), Square::new(4, 6));
        assert_eq!(Square::all().count(), 64);
    }
}
