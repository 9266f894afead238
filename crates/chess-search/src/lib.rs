//! Depth-limited adversarial search for choosing moves.
//!
//! - [`evaluate`] scores a board by material and piece-square tables
//! - [`Searcher`] runs minimax with alpha-beta pruning over a
//!   [`chess_engine::Board`], making and unmaking moves in place
//! - [`MoveSuggester`] abstracts over anything that proposes moves
//!
//! # Example
//!
//! ```
//! use chess_engine::Board;
//! use chess_search::{SearchConfig, Searcher};
//!
//! let mut board = Board::startpos();
//! let mut searcher = Searcher::new(SearchConfig { depth: 2, ..Default::default() });
//! let outcome = searcher.search(&mut board).unwrap();
//! println!("best: {} ({} cp, {} nodes)", outcome.best_move, outcome.score, outcome.nodes);
//! ```

mod config;
pub mod eval;
mod search;
mod suggest;

pub use config::SearchConfig;
pub use eval::evaluate;
pub use search::{SearchError, SearchOutcome, Searcher, INF, MATE};
pub use suggest::{MinimaxSuggester, MoveSuggester, ScriptedSuggester, SuggestError};
