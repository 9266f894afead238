//! Game outcome types and draw-rule configuration.

use chess_core::Color;
use serde::Deserialize;
use std::fmt;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// Result for a checkmate delivered by `winner`.
    pub const fn win_for(winner: Color) -> Self {
        match winner {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "1-0"),
            GameResult::BlackWins => write!(f, "0-1"),
            GameResult::Draw(_) => write!(f, "1/2-1/2"),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Halfmove clock reached the configured limit.
    FiftyMoveRule,
    /// The same position occurred the configured number of times.
    ThreefoldRepetition,
}

/// Why the game ended, or `None` while it is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameOverReason {
    #[default]
    None,
    Checkmate,
    Stalemate,
    FiftyMove,
    ThreefoldRepetition,
}

impl GameOverReason {
    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameOverReason::None)
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameOverReason::None => "in progress",
            GameOverReason::Checkmate => "checkmate",
            GameOverReason::Stalemate => "stalemate",
            GameOverReason::FiftyMove => "fifty-move rule",
            GameOverReason::ThreefoldRepetition => "threefold repetition",
        };
        f.write_str(text)
    }
}

/// Draw thresholds applied by [`Game`](crate::Game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Half-moves without a pawn move or capture before the game is drawn.
    pub fifty_move_limit: u32,
    /// Occurrences of one position before the game is drawn.
    pub repetition_limit: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            fifty_move_limit: 100,
            repetition_limit: 3,
        }
    }
}
