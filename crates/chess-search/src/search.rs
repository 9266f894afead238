//! Minimax search with alpha-beta pruning.
//!
//! Scores are always from the point of view of the side the search plays
//! for: maximizing nodes are that side's turns, minimizing nodes the
//! opponent's. Moves are made and unmade on the caller's board, which is
//! returned in its original state.

use crate::eval::evaluate;
use crate::SearchConfig;
use chess_core::{Color, ParseError};
use chess_engine::{in_check, legal_moves, Board, Move};
use thiserror::Error;
use tracing::debug;

/// Bound larger than any reachable score.
pub const INF: i32 = 1_000_000;

/// Score of delivering mate at the root; mates further away score less.
pub const MATE: i32 = 100_000;

/// Errors returned by [`Searcher::best_move`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0} is not the side to move")]
    NotToMove(Color),

    #[error("no legal moves in this position")]
    NoLegalMoves,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    /// Score of `best_move` for the side that searched.
    pub score: i32,
    /// Nodes visited, leaves included.
    pub nodes: u64,
}

/// Search state
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
    nodes: u64,
    perspective: Color,
    root_ply: usize,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            config,
            nodes: 0,
            perspective: Color::White,
            root_ply: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches for the side to move at the configured depth.
    pub fn search(&mut self, board: &mut Board) -> Result<SearchOutcome, SearchError> {
        let side = board.side_to_move();
        self.best_move(board, side, self.config.depth)
    }

    /// Picks the move with the highest score for `side`.
    ///
    /// Each root move is searched `depth - 1` further plies. Ties go to the
    /// move generated first. A depth of zero is treated as one.
    pub fn best_move(
        &mut self,
        board: &mut Board,
        side: Color,
        depth: u32,
    ) -> Result<SearchOutcome, SearchError> {
        if board.side_to_move() != side {
            return Err(SearchError::NotToMove(side));
        }
        let depth = depth.max(1);
        self.start(board, side);

        let moves = legal_moves(board);
        let mut best: Option<(Move, i32)> = None;
        let mut alpha = -INF;

        for m in &moves {
            board.push(*m);
            let score = self.alpha_beta_node(board, depth - 1, alpha, INF, false);
            board.pop();

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((*m, score));
            }
            alpha = alpha.max(score);
        }

        let (best_move, score) = best.ok_or(SearchError::NoLegalMoves)?;
        debug!(
            %side,
            depth,
            nodes = self.nodes,
            score,
            best = %best_move,
            "search complete"
        );
        Ok(SearchOutcome {
            best_move,
            score,
            nodes: self.nodes,
        })
    }

    /// Alpha-beta value of `board`.
    ///
    /// `maximizing` says whether the side to move is the side being scored
    /// for. When a node's window closes (`beta <= alpha`) its remaining
    /// moves are skipped and the running best is returned as is.
    pub fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.start(board, scored_side(board, maximizing));
        self.alpha_beta_node(board, depth, alpha, beta, maximizing)
    }

    /// Plain minimax value of `board`, visiting every node.
    ///
    /// Scores leaves and terminal positions exactly as [`Searcher::alpha_beta`]
    /// does, so both agree when alpha-beta starts from `(-INF, INF)`.
    pub fn minimax(&mut self, board: &mut Board, depth: u32, maximizing: bool) -> i32 {
        self.start(board, scored_side(board, maximizing));
        self.minimax_node(board, depth, maximizing)
    }

    fn start(&mut self, board: &Board, perspective: Color) {
        self.nodes = 0;
        self.perspective = perspective;
        self.root_ply = board.undo_depth();
    }

    fn alpha_beta_node(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;
        if depth == 0 {
            return self.leaf_score(board);
        }

        let moves = legal_moves(board);
        if moves.is_empty() {
            return self.terminal_score(board);
        }

        if maximizing {
            let mut value = -INF;
            for m in &moves {
                board.push(*m);
                let score = self.alpha_beta_node(board, depth - 1, alpha, beta, false);
                board.pop();
                value = value.max(score);
                alpha = alpha.max(value);
                if beta <= alpha {
                    return value;
                }
            }
            value
        } else {
            let mut value = INF;
            for m in &moves {
                board.push(*m);
                let score = self.alpha_beta_node(board, depth - 1, alpha, beta, true);
                board.pop();
                value = value.min(score);
                beta = beta.min(value);
                if beta <= alpha {
                    return value;
                }
            }
            value
        }
    }

    fn minimax_node(&mut self, board: &mut Board, depth: u32, maximizing: bool) -> i32 {
        self.nodes += 1;
        if depth == 0 {
            return self.leaf_score(board);
        }

        let moves = legal_moves(board);
        if moves.is_empty() {
            return self.terminal_score(board);
        }

        let mut value = if maximizing { -INF } else { INF };
        for m in &moves {
            board.push(*m);
            let score = self.minimax_node(board, depth - 1, !maximizing);
            board.pop();
            value = if maximizing {
                value.max(score)
            } else {
                value.min(score)
            };
        }
        value
    }

    fn leaf_score(&self, board: &mut Board) -> i32 {
        if self.config.terminal_at_horizon && legal_moves(board).is_empty() {
            return self.terminal_score(board);
        }
        evaluate(board, self.perspective)
    }

    /// Score of a position with no legal moves.
    fn terminal_score(&self, board: &Board) -> i32 {
        if !in_check(board) {
            return 0;
        }
        let ply = (board.undo_depth() - self.root_ply) as i32;
        if board.side_to_move() == self.perspective {
            -(MATE - ply)
        } else {
            MATE - ply
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

fn scored_side(board: &Board, maximizing: bool) -> Color {
    if maximizing {
        board.side_to_move()
    } else {
        board.side_to_move().opposite()
    }
}
