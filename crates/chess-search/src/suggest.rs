//! Move suggestion providers.
//!
//! A [`MoveSuggester`] receives a position as FEN and answers with a
//! coordinate move such as `"e2e4"`. Front ends use it to drive an automated
//! player without knowing whether the answer comes from this crate's search,
//! an external engine or a fixed script.

use crate::{SearchConfig, SearchError, Searcher};
use chess_core::ParseError;
use chess_engine::Board;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors from a move suggester.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("no scripted moves left")]
    Exhausted,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that proposes a move for a position.
pub trait MoveSuggester {
    /// Returns a coordinate move for the side to move in `position` (FEN).
    fn best_move(&mut self, position: &str) -> Result<String, SuggestError>;
}

/// Answers with a fixed sequence of moves, ignoring the position.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSuggester {
    moves: VecDeque<String>,
}

impl ScriptedSuggester {
    pub fn new<I, S>(moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedSuggester {
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }

    /// Moves not yet handed out.
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveSuggester for ScriptedSuggester {
    fn best_move(&mut self, _position: &str) -> Result<String, SuggestError> {
        self.moves.pop_front().ok_or(SuggestError::Exhausted)
    }
}

/// Suggests moves with this crate's minimax search.
#[derive(Debug, Clone, Default)]
pub struct MinimaxSuggester {
    searcher: Searcher,
}

impl MinimaxSuggester {
    pub fn new(config: SearchConfig) -> Self {
        MinimaxSuggester {
            searcher: Searcher::new(config),
        }
    }
}

impl MoveSuggester for MinimaxSuggester {
    fn best_move(&mut self, position: &str) -> Result<String, SuggestError> {
        let mut board = Board::from_fen(position)?;
        let outcome = self.searcher.search(&mut board)?;
        Ok(outcome.best_move.to_string())
    }
}
