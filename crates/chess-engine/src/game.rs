//! Game management: the query and command surface used by front ends.
//!
//! [`Game`] owns a [`Board`] and keeps:
//! - the legal moves of the side to move, recomputed after every change
//! - a FEN snapshot per played move, checked against the unmade board on undo
//! - the position occurrence ledger for repetition draws
//! - the numbered move transcript

use crate::movegen::{in_check, legal_moves};
use crate::notation::{move_to_notation, Transcript};
use crate::rules::{DrawReason, GameOverReason, GameResult, RulesConfig};
use crate::{Board, Move, MoveList, Piece, PieceId};
use chess_core::{Color, CoordMove, ParseError, Square, SquareError};
use thiserror::Error;
use tracing::{debug, info};

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    InvalidSquare(#[from] SquareError),

    #[error("game has already ended")]
    GameAlreadyOver,

    #[error("no move to undo")]
    NothingToUndo,
}

/// A chess game between two players.
///
/// Every command either succeeds and leaves the game consistent or fails
/// and leaves it untouched.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    config: RulesConfig,
    /// Legal moves of the side to move.
    legal: MoveList,
    /// FEN of the position before each played move.
    snapshots: Vec<String>,
    transcript: Transcript,
    reason: GameOverReason,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

impl Game {
    /// Creates a new game from the standard starting position.
    pub fn new(config: RulesConfig) -> Self {
        Self::from_board(Board::startpos(), config)
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str, config: RulesConfig) -> Result<Self, GameError> {
        Ok(Self::from_board(Board::from_fen(fen)?, config))
    }

    /// Creates a game from a board. The board's position counts as its
    /// first occurrence.
    pub fn from_board(mut board: Board, config: RulesConfig) -> Self {
        board.record_position();
        let mut game = Game {
            board,
            config,
            legal: MoveList::new(),
            snapshots: Vec::new(),
            transcript: Transcript::new(),
            reason: GameOverReason::None,
        };
        game.refresh();
        game
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Returns the piece on a square, if any.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.piece_at(square)
    }

    /// Returns the legal moves of the side to move.
    ///
    /// Empty once the game is over.
    pub fn legal_moves(&self) -> &MoveList {
        &self.legal
    }

    /// Returns the squares a piece may legally move to.
    pub fn legal_destinations(&self, piece: PieceId) -> Vec<Square> {
        self.legal
            .iter()
            .filter(|m| m.piece == piece)
            .map(|m| m.to)
            .collect()
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        in_check(&self.board)
    }

    pub fn is_game_over(&self) -> bool {
        self.reason.is_over()
    }

    pub fn game_over_reason(&self) -> GameOverReason {
        self.reason
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        match self.reason {
            GameOverReason::None => None,
            GameOverReason::Checkmate => {
                Some(GameResult::win_for(self.board.side_to_move().opposite()))
            }
            GameOverReason::Stalemate => Some(GameResult::Draw(DrawReason::Stalemate)),
            GameOverReason::FiftyMove => Some(GameResult::Draw(DrawReason::FiftyMoveRule)),
            GameOverReason::ThreefoldRepetition => {
                Some(GameResult::Draw(DrawReason::ThreefoldRepetition))
            }
        }
    }

    /// Returns the numbered record of played moves.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the number of half-moves played in this game.
    pub fn ply_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Moves `piece` to `destination` if that is a legal move.
    pub fn apply_user_move(
        &mut self,
        piece: PieceId,
        destination: Square,
    ) -> Result<GameOverReason, GameError> {
        self.ensure_running()?;
        let found = self
            .legal
            .iter()
            .copied()
            .find(|m| m.piece == piece && m.to == destination);
        match found {
            Some(m) => Ok(self.apply_move(m)),
            None => {
                let from = self
                    .board
                    .pieces
                    .get(piece.index())
                    .filter(|p| !p.captured)
                    .map(|p| p.square.to_string())
                    .unwrap_or_else(|| "??".to_string());
                debug!(%from, to = %destination, "rejected move");
                Err(GameError::IllegalMove(format!("{from}{destination}")))
            }
        }
    }

    /// Plays a move given as a coordinate pair such as `"e2e4"`.
    pub fn apply_coordinate_move(&mut self, text: &str) -> Result<GameOverReason, GameError> {
        self.ensure_running()?;
        let coord: CoordMove = text.parse()?;
        let found = self.legal.iter().copied().find(|m| m.coord() == coord);
        match found {
            Some(m) => Ok(self.apply_move(m)),
            None => {
                debug!(mv = %coord, "rejected move");
                Err(GameError::IllegalMove(text.to_string()))
            }
        }
    }

    /// Plays a move taken from [`Game::legal_moves`].
    pub fn make_move(&mut self, m: Move) -> Result<GameOverReason, GameError> {
        self.ensure_running()?;
        if !self.legal.as_slice().contains(&m) {
            return Err(GameError::IllegalMove(m.to_string()));
        }
        Ok(self.apply_move(m))
    }

    /// Takes back the last played move.
    ///
    /// Unmakes the move on the board, so every [`PieceId`] handed out
    /// before keeps naming the same piece. Removes one occurrence of the
    /// abandoned position and drops the last transcript entry.
    pub fn undo(&mut self) -> Result<(), GameError> {
        let snapshot = self.snapshots.pop().ok_or(GameError::NothingToUndo)?;
        self.board.forget_position();
        self.board.pop();
        debug_assert_eq!(self.board.to_fen(), snapshot);
        self.transcript.pop();
        self.refresh();
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.reason.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        Ok(())
    }

    fn apply_move(&mut self, m: Move) -> GameOverReason {
        let text = move_to_notation(&self.board, m);
        let mover = self.board.side_to_move();
        let number = self.board.fullmove_number();

        self.snapshots.push(self.board.to_fen());
        self.board.push(m);
        self.board.record_position();
        self.transcript.push(number, mover, text);
        self.refresh()
    }

    /// Recomputes legal moves and the end-of-game status.
    fn refresh(&mut self) -> GameOverReason {
        self.legal = legal_moves(&mut self.board);

        self.reason = if self.legal.is_empty() {
            if in_check(&self.board) {
                GameOverReason::Checkmate
            } else {
                GameOverReason::Stalemate
            }
        } else if self.board.halfmove_clock() >= self.config.fifty_move_limit {
            GameOverReason::FiftyMove
        } else if self.board.repetition_count() >= self.config.repetition_limit {
            GameOverReason::ThreefoldRepetition
        } else {
            GameOverReason::None
        };

        if self.reason.is_over() {
            self.legal = MoveList::new();
            info!(
                reason = %self.reason,
                fen = %self.board.to_fen(),
                transcript = %self.transcript,
                "game over"
            );
        }
        self.reason
    }
}
