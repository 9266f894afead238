//! Chess rules engine built on a piece arena.
//!
//! This crate provides:
//! - [`Board`] - pieces addressed by stable [`PieceId`] handles, an occupancy
//!   grid, castling rights, en passant state and clocks
//! - Reversible move application ([`Board::apply`] / [`Board::unmake`])
//! - Legal move generation and attack detection in [`movegen`]
//! - FEN encoding and decoding, move notation and the game [`Transcript`]
//! - [`Game`] - the query/command surface with draw detection and undo
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, RulesConfig};
//!
//! let mut game = Game::new(RulesConfig::default());
//! game.apply_coordinate_move("e2e4").unwrap();
//! game.apply_coordinate_move("e7e5").unwrap();
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! println!("{}", game.transcript());
//! ```

mod board;
mod game;
mod make;
mod mov;
pub mod movegen;
pub mod notation;
mod piece;
pub mod rules;
mod zobrist;

pub use board::{Board, CastlingRights};
pub use game::{Game, GameError};
pub use make::UndoRecord;
pub use mov::Move;
pub use movegen::{
    in_check, is_attacked, is_checkmate, is_stalemate, legal_destinations, legal_moves,
    legal_moves_grouped, MoveList,
};
pub use notation::{move_to_notation, Transcript};
pub use piece::{Piece, PieceId};
pub use rules::{DrawReason, GameOverReason, GameResult, RulesConfig};
pub use zobrist::{ZobristKeys, ZOBRIST};
