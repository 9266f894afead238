//! Making and unmaking moves.
//!
//! [`Board::apply`] mutates the board in place and returns an [`UndoRecord`]
//! holding everything needed to restore the prior state exactly.
//! [`Board::push`] and [`Board::pop`] keep those records on the board's own
//! undo log for callers that walk a tree of moves.

use chess_core::{Color, MoveKind, PieceKind, Square};

use crate::{Board, CastlingRights, Move, PieceId};

/// State captured by [`Board::apply`] and consumed by [`Board::unmake`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    pub(crate) mv: Move,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    mover_had_moved: bool,
    rook_had_moved: bool,
    /// Pawn whose double-step flag expired when this move was made.
    expired_double_step: Option<PieceId>,
}

impl UndoRecord {
    /// The move this record undoes.
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// Origin and destination of the rook for a castling move.
fn castling_rook_squares(kind: MoveKind, back_rank: u8) -> (Square, Square) {
    match kind {
        MoveKind::ShortCastle => (Square::new(7, back_rank), Square::new(5, back_rank)),
        _ => (Square::new(0, back_rank), Square::new(3, back_rank)),
    }
}

impl Board {
    /// Plays `m` and returns the record that reverses it.
    ///
    /// `m` must have been generated for this board in its current state.
    pub fn apply(&mut self, m: Move) -> UndoRecord {
        let us = self.side_to_move;
        let them = us.opposite();
        debug_assert_eq!(self.pieces[m.piece.index()].color, us);
        debug_assert_eq!(self.grid[m.from.index()], Some(m.piece));

        let mut undo = UndoRecord {
            mv: m,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            mover_had_moved: self.pieces[m.piece.index()].has_moved,
            rook_had_moved: false,
            expired_double_step: None,
        };

        // The opponent's double step is only capturable on this ply.
        if let Some(target) = self.en_passant.take() {
            if let Some(id) = target
                .offset(0, them.pawn_direction())
                .and_then(|sq| self.grid[sq.index()])
            {
                if self.pieces[id.index()].just_double_stepped {
                    self.pieces[id.index()].just_double_stepped = false;
                    undo.expired_double_step = Some(id);
                }
            }
        }

        if let Some(captured) = m.captured {
            let victim = &mut self.pieces[captured.index()];
            victim.captured = true;
            let square = victim.square;
            let kind = victim.kind;
            self.grid[square.index()] = None;
            if kind == PieceKind::Rook {
                self.castling.remove_for_rook_square(them, square);
            }
        }

        let moved_kind = self.pieces[m.piece.index()].kind;
        self.grid[m.from.index()] = None;
        self.grid[m.to.index()] = Some(m.piece);
        {
            let piece = &mut self.pieces[m.piece.index()];
            piece.square = m.to;
            piece.has_moved = true;
        }

        match m.kind {
            MoveKind::DoublePawnStep => {
                self.pieces[m.piece.index()].just_double_stepped = true;
                self.en_passant = m.from.offset(0, us.pawn_direction());
            }
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let (rook_from, rook_to) = castling_rook_squares(m.kind, us.back_rank());
                if let Some(rook) = self.grid[rook_from.index()].take() {
                    let piece = &mut self.pieces[rook.index()];
                    undo.rook_had_moved = piece.has_moved;
                    piece.square = rook_to;
                    piece.has_moved = true;
                    self.grid[rook_to.index()] = Some(rook);
                }
            }
            MoveKind::Promotion => {
                self.pieces[m.piece.index()].kind = PieceKind::Queen;
            }
            MoveKind::Normal | MoveKind::EnPassantCapture => {}
        }

        match moved_kind {
            PieceKind::King => self.castling.remove_color(us),
            PieceKind::Rook => self.castling.remove_for_rook_square(us, m.from),
            _ => {}
        }

        if moved_kind == PieceKind::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;

        undo
    }

    /// Reverses a move previously made with [`Board::apply`].
    ///
    /// Records must be unmade in the reverse order they were produced.
    pub fn unmake(&mut self, undo: UndoRecord) {
        let m = undo.mv;
        let us = self.side_to_move.opposite();
        self.side_to_move = us;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        match m.kind {
            MoveKind::DoublePawnStep => {
                self.pieces[m.piece.index()].just_double_stepped = false;
            }
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let (rook_from, rook_to) = castling_rook_squares(m.kind, us.back_rank());
                if let Some(rook) = self.grid[rook_to.index()].take() {
                    let piece = &mut self.pieces[rook.index()];
                    piece.square = rook_from;
                    piece.has_moved = undo.rook_had_moved;
                    self.grid[rook_from.index()] = Some(rook);
                }
            }
            MoveKind::Promotion => {
                self.pieces[m.piece.index()].kind = PieceKind::Pawn;
            }
            MoveKind::Normal | MoveKind::EnPassantCapture => {}
        }

        self.grid[m.to.index()] = None;
        self.grid[m.from.index()] = Some(m.piece);
        {
            let piece = &mut self.pieces[m.piece.index()];
            piece.square = m.from;
            piece.has_moved = undo.mover_had_moved;
        }

        if let Some(captured) = m.captured {
            let victim = &mut self.pieces[captured.index()];
            victim.captured = false;
            self.grid[victim.square.index()] = Some(captured);
        }

        if let Some(id) = undo.expired_double_step {
            self.pieces[id.index()].just_double_stepped = true;
        }
    }

    /// Plays `m` and keeps its undo record on the board.
    pub fn push(&mut self, m: Move) {
        let undo = self.apply(m);
        self.undo_log.push(undo);
    }

    /// Takes back the most recent [`Board::push`], returning its move.
    pub fn pop(&mut self) -> Option<Move> {
        let undo = self.undo_log.pop()?;
        self.unmake(undo);
        Some(undo.mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::legal_moves;

    fn find(board: &mut Board, uci: &str) -> Move {
        legal_moves(board)
            .iter()
            .copied()
            .find(|m| m.to_string() == uci)
            .unwrap_or_else(|| panic!("{uci} not legal in {}", board.to_fen()))
    }

    #[test]
    fn quiet_move_and_back() {
        let mut board = Board::startpos();
        let before = board.clone();
        let m = find(&mut board, "g1f3");
        let undo = board.apply(m);
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.halfmove_clock(), 1);
        assert!(board.piece_at(Square::G1).is_none());
        board.unmake(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn double_step_sets_and_expires_en_passant() {
        let mut board = Board::startpos();
        let m = find(&mut board, "e2e4");
        board.push(m);
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(board.en_passant(), Square::from_algebraic("e3").ok());
        assert!(board.piece_at(e4).unwrap().just_double_stepped);

        let reply = find(&mut board, "g8f6");
        board.push(reply);
        assert_eq!(board.en_passant(), None);
        assert!(!board.piece_at(e4).unwrap().just_double_stepped);

        board.pop();
        assert!(board.piece_at(e4).unwrap().just_double_stepped);
        board.pop();
        assert_eq!(board, Board::startpos());
    }

    #[test]
    fn en_passant_capture_removes_passed_pawn() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();
        let m = find(&mut board, "e5d6");
        assert_eq!(m.kind, MoveKind::EnPassantCapture);
        let undo = board.apply(m);
        assert!(board.piece_at(Square::from_algebraic("d5").unwrap()).is_none());
        assert_eq!(board.pieces().count(), 3);
        board.unmake(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();
        let m = find(&mut board, "e1g1");
        assert_eq!(m.kind, MoveKind::ShortCastle);
        let undo = board.apply(m);
        assert_eq!(board.piece_at(Square::F1).unwrap().kind, PieceKind::Rook);
        assert!(board.piece_at(Square::H1).is_none());
        assert_eq!(board.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        board.unmake(undo);
        assert_eq!(board, before);

        let m = find(&mut board, "e1c1");
        board.push(m);
        assert_eq!(board.to_fen(), "r3k2r/8/8/8/8/8/8/2KR3R b kq - 1 1");
        board.pop();
        assert_eq!(board, before);
    }

    #[test]
    fn capturing_a_corner_rook_removes_right() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let m = find(&mut board, "a1a8");
        board.push(m);
        assert_eq!(board.to_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
        board.pop();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn promotion_keeps_piece_handle() {
        let fen = "8/P7/8/8/8/8/8/k3K3 w - - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();
        let m = find(&mut board, "a7a8");
        assert_eq!(m.kind, MoveKind::Promotion);
        board.push(m);
        let queen = board.piece_at(Square::A8).unwrap();
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.id, m.piece);
        board.pop();
        assert_eq!(board, before);
    }

    #[test]
    fn fullmove_increments_after_black() {
        let mut board = Board::startpos();
        let m = find(&mut board, "e2e4");
        board.push(m);
        assert_eq!(board.fullmove_number(), 1);
        let m = find(&mut board, "e7e5");
        board.push(m);
        assert_eq!(board.fullmove_number(), 2);
        assert_eq!(board.undo_depth(), 2);
    }

    #[test]
    fn pop_on_empty_log() {
        let mut board = Board::startpos();
        assert_eq!(board.pop(), None);
    }
}
