//! Moves bound to the pieces of a particular board.

use crate::PieceId;
use chess_core::{CoordMove, MoveKind, Square};
use std::fmt;

/// A move on a specific board.
///
/// Unlike [`CoordMove`], a `Move` names the moving piece and the captured
/// piece by handle, so it is only meaningful on the board that generated it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceId>,
    pub kind: MoveKind,
}

impl Move {
    /// Placeholder used to fill move buffers; never a legal move.
    pub const NULL: Move = Move {
        piece: PieceId(0),
        from: Square::A1,
        to: Square::A1,
        captured: None,
        kind: MoveKind::Normal,
    };

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Origin/destination pair of this move.
    #[inline]
    pub const fn coord(&self) -> CoordMove {
        CoordMove::new(self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{} {:?})", self.from, self.to, self.kind)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
