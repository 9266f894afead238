//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the engine and search:
//! - [`PieceKind`] and [`Color`] for piece identity
//! - [`Square`] for board coordinates
//! - [`MoveKind`] and [`CoordMove`] for move classification and the
//!   coordinate notation spoken by external engines
//! - FEN field parsing

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenParser, ParseError};
pub use mov::{CoordMove, MoveKind};
pub use piece::PieceKind;
pub use square::{Square, SquareError};
