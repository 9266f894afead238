//! Piece records owned by the board.

use chess_core::{Color, PieceKind, Square};
use std::fmt;

/// Stable handle to a piece on a [`Board`](crate::Board).
///
/// Handles index the board's piece arena. A captured piece keeps its handle,
/// so unmaking the capture brings back the very same piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u8);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PieceId({})", self.0)
    }
}

/// A single piece and its rule-relevant history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    /// Current square, or the square it was captured on.
    pub square: Square,
    pub has_moved: bool,
    /// Set on a pawn for exactly the ply after its double step.
    pub just_double_stepped: bool,
    pub captured: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, color: Color, square: Square) -> Self {
        Piece {
            id,
            kind,
            color,
            square,
            has_moved: false,
            just_double_stepped: false,
            captured: false,
        }
    }

    /// FEN letter for this piece.
    #[inline]
    pub const fn fen_char(&self) -> char {
        self.kind.to_fen_char(self.color)
    }
}
