//! Short algebraic move text and the numbered game transcript.

use crate::{Board, Move};
use chess_core::{Color, MoveKind, PieceKind};
use std::fmt;

/// Renders a move in short algebraic form.
///
/// `board` must be the position before the move. Castling is written
/// `O-O`/`O-O-O`; other moves are the piece letter (omitted for pawns), an
/// `x` on captures and the destination. Pawn captures are prefixed with the
/// origin file. No disambiguation, promotion or check suffixes are added.
pub fn move_to_notation(board: &Board, m: Move) -> String {
    match m.kind {
        MoveKind::ShortCastle => return "O-O".to_string(),
        MoveKind::LongCastle => return "O-O-O".to_string(),
        _ => {}
    }

    let mut text = String::with_capacity(6);
    let kind = board.piece(m.piece).kind;
    if kind == PieceKind::Pawn {
        if m.is_capture() {
            text.push(m.from.file_char());
        }
    } else {
        text.push(kind.letter());
    }
    if m.is_capture() {
        text.push('x');
    }
    text.push_str(&m.to.to_algebraic());
    text
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TranscriptEntry {
    number: u32,
    mover: Color,
    text: String,
}

/// Numbered record of the moves played in a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move made by `mover` during full move `number`.
    pub fn push(&mut self, number: u32, mover: Color, text: String) {
        self.entries.push(TranscriptEntry {
            number,
            mover,
            text,
        });
    }

    /// Removes the last move, returning its text.
    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop().map(|e| e.text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move texts in play order, without numbers.
    pub fn moves(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match entry.mover {
                Color::White => write!(f, "{}. ", entry.number)?,
                Color::Black if i == 0 => write!(f, "{}... ", entry.number)?,
                Color::Black => {}
            }
            f.write_str(&entry.text)?;
        }
        Ok(())
    }
}
