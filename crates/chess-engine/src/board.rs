//! Board state: piece arena, occupancy grid, rights and clocks.

use std::collections::HashMap;

use chess_core::{Color, FenParser, ParseError, PieceKind, Square};
use tracing::debug;

use crate::make::UndoRecord;
use crate::zobrist::ZOBRIST;
use crate::{Piece, PieceId};

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn bit(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => 0b0001,
            (Color::White, false) => 0b0010,
            (Color::Black, true) => 0b0100,
            (Color::Black, false) => 0b1000,
        }
    }

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.0 & Self::bit(color, true) != 0
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.0 & Self::bit(color, false) != 0
    }

    /// Removes both rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.0 &= !(Self::bit(color, true) | Self::bit(color, false));
    }

    /// Removes the right tied to a rook home square, if `square` is one.
    pub fn remove_for_rook_square(&mut self, color: Color, square: Square) {
        if square == Square::new(7, color.back_rank()) {
            self.0 &= !Self::bit(color, true);
        } else if square == Square::new(0, color.back_rank()) {
            self.0 &= !Self::bit(color, false);
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    fn from_fen_field(field: &str) -> Self {
        let mut rights = 0u8;
        for c in field.chars() {
            rights |= match c {
                'K' => Self::bit(Color::White, true),
                'Q' => Self::bit(Color::White, false),
                'k' => Self::bit(Color::Black, true),
                'q' => Self::bit(Color::Black, false),
                _ => 0,
            };
        }
        CastlingRights(rights)
    }

    fn to_fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut field = String::with_capacity(4);
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.0 & Self::bit(color, kingside) != 0 {
                field.push(c);
            }
        }
        field
    }
}

/// Complete game position.
///
/// Pieces live in a flat arena addressed by [`PieceId`]; the grid maps each
/// square to the handle occupying it. Captured pieces stay in the arena,
/// flagged, so that unmaking a capture restores the original handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) grid: [Option<PieceId>; 64],
    pub(crate) pieces: Vec<Piece>,
    pub(crate) side_to_move: Color,
    pub(crate) kings: [PieceId; 2],
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Occurrence count per position signature.
    pub(crate) repetitions: HashMap<u64, u32>,
    pub(crate) undo_log: Vec<UndoRecord>,
}

impl Board {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Decodes a board from FEN.
    ///
    /// Only the final placement is known, so move history is inferred:
    /// pawns off their start rank and kings or rooks off their home squares
    /// are marked as moved, as is any home-square rook whose castling right
    /// is absent. Castling rights without the king and rook in place are
    /// dropped.
    pub fn from_fen(fen: &str) -> Result<Self, ParseError> {
        let parsed = FenParser::parse(fen)?;

        let mut grid = [None; 64];
        let mut pieces = Vec::with_capacity(parsed.placement.len());
        let mut kings: [Option<PieceId>; 2] = [None, None];

        for &(square, kind, color) in &parsed.placement {
            let id = PieceId(pieces.len() as u8);
            if kind == PieceKind::King {
                if kings[color.index()].is_some() {
                    return Err(ParseError::KingCount(color));
                }
                kings[color.index()] = Some(id);
            }
            grid[square.index()] = Some(id);
            pieces.push(Piece::new(id, kind, color, square));
        }

        let white_king = kings[0].ok_or(ParseError::KingCount(Color::White))?;
        let black_king = kings[1].ok_or(ParseError::KingCount(Color::Black))?;

        let mut board = Board {
            grid,
            pieces,
            side_to_move: parsed.active_color,
            kings: [white_king, black_king],
            castling: CastlingRights::from_fen_field(&parsed.castling),
            en_passant: None,
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
            repetitions: HashMap::new(),
            undo_log: Vec::new(),
        };

        board.sanitize_castling();
        board.infer_has_moved();

        if let Some(target) = parsed.en_passant {
            board.set_en_passant(target)?;
        }

        Ok(board)
    }

    fn sanitize_castling(&mut self) {
        let before = self.castling;
        for color in Color::BOTH {
            let rank = color.back_rank();
            let king_home = self.king(color).square == Square::new(4, rank);
            for file in [0, 7] {
                let corner = Square::new(file, rank);
                let rook_home = self
                    .piece_at(corner)
                    .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color);
                if !(king_home && rook_home) {
                    self.castling.remove_for_rook_square(color, corner);
                }
            }
        }
        if before != self.castling {
            debug!(
                before = %before.to_fen_field(),
                after = %self.castling.to_fen_field(),
                "dropped castling rights without king and rook at home"
            );
        }
    }

    fn infer_has_moved(&mut self) {
        let castling = self.castling;
        for piece in &mut self.pieces {
            let rank = piece.color.back_rank();
            piece.has_moved = match piece.kind {
                PieceKind::Pawn => piece.square.rank() != piece.color.pawn_rank(),
                PieceKind::King => piece.square != Square::new(4, rank),
                PieceKind::Rook => {
                    if piece.square == Square::new(7, rank) {
                        !castling.can_castle_kingside(piece.color)
                    } else if piece.square == Square::new(0, rank) {
                        !castling.can_castle_queenside(piece.color)
                    } else {
                        true
                    }
                }
                _ => false,
            };
        }
    }

    /// Sets the en passant target, marking the pawn that just double-stepped.
    fn set_en_passant(&mut self, target: Square) -> Result<(), ParseError> {
        let mover = self.side_to_move.opposite();
        let invalid = || ParseError::InvalidEnPassantSquare(target.to_algebraic());
        let skipped_rank = mover.pawn_rank() as i8 + mover.pawn_direction();
        if target.rank() as i8 != skipped_rank {
            return Err(invalid());
        }
        // The skipped square and the pawn's origin must both be empty.
        let origin = target
            .offset(0, -mover.pawn_direction())
            .ok_or_else(invalid)?;
        if self.piece_at(target).is_some() || self.piece_at(origin).is_some() {
            return Err(invalid());
        }
        let pawn_square = target
            .offset(0, mover.pawn_direction())
            .ok_or_else(invalid)?;
        let pawn = self
            .piece_at(pawn_square)
            .filter(|p| p.kind == PieceKind::Pawn && p.color == mover)
            .map(|p| p.id)
            .ok_or_else(invalid)?;
        self.pieces[pawn.index()].just_double_stepped = true;
        self.en_passant = Some(target);
        Ok(())
    }

    /// Encodes the board as FEN.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(self.side_to_move.to_fen_char());
        fen.push(' ');
        fen.push_str(&self.castling.to_fen_field());
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the piece on a square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.grid[sq.index()].map(|id| &self.pieces[id.index()])
    }

    /// Returns the piece record for a handle (captured pieces included).
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Iterates over the pieces still on the board, in arena order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| !p.captured)
    }

    /// Iterates over one side's pieces still on the board.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.color == color)
    }

    /// Returns the king of the given color.
    #[inline]
    pub fn king(&self, color: Color) -> &Piece {
        &self.pieces[self.kings[color.index()].index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Number of moves currently on the undo log.
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo_log.len()
    }

    /// Signature used for repetition detection.
    ///
    /// Covers placement, side to move, castling rights and the en passant
    /// target; clocks are excluded.
    pub fn signature(&self) -> u64 {
        let mut hash = ZOBRIST.side_key(self.side_to_move)
            ^ ZOBRIST.castling_key(self.castling.raw())
            ^ ZOBRIST.en_passant_key(self.en_passant);
        for piece in self.pieces() {
            hash ^= ZOBRIST.piece_key(piece.kind, piece.color, piece.square);
        }
        hash
    }

    /// Counts one more occurrence of the current position and returns the total.
    pub fn record_position(&mut self) -> u32 {
        let count = self.repetitions.entry(self.signature()).or_insert(0);
        *count += 1;
        *count
    }

    /// Removes one occurrence of the current position.
    pub fn forget_position(&mut self) {
        let signature = self.signature();
        if let Some(count) = self.repetitions.get_mut(&signature) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&signature);
            }
        }
    }

    /// How many times the current position has been recorded.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.signature())
            .copied()
            .unwrap_or(0)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_fen_roundtrip() {
        let board = Board::startpos();
        assert_eq!(board.to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn missing_counters_default() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(board.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn grid_and_pieces_agree() {
        let board = Board::startpos();
        assert_eq!(board.pieces().count(), 32);
        for piece in board.pieces() {
            assert_eq!(board.piece_at(piece.square).map(|p| p.id), Some(piece.id));
        }
        assert_eq!(board.king(Color::White).square, Square::E1);
        assert_eq!(board.king(Color::Black).square, Square::E8);
    }

    #[test]
    fn king_count_is_enforced() {
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ParseError::KingCount(Color::Black))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/K6K w - - 0 1"),
            Err(ParseError::KingCount(Color::White))
        );
    }

    #[test]
    fn has_moved_is_inferred_from_placement() {
        let board =
            Board::from_fen("r3k2r/p7/8/8/4P3/8/8/R3K1R1 w Qkq - 0 1").unwrap();
        let at = |name: &str| *board.piece_at(Square::from_algebraic(name).unwrap()).unwrap();
        assert!(!at("e1").has_moved);
        assert!(!at("a1").has_moved);
        assert!(at("g1").has_moved);
        assert!(at("e4").has_moved);
        assert!(!at("a7").has_moved);
        assert!(!at("h8").has_moved);
    }

    #[test]
    fn absent_right_marks_home_rook_moved() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1").unwrap();
        assert!(board.piece_at(Square::A1).unwrap().has_moved);
        assert!(!board.piece_at(Square::H1).unwrap().has_moved);
    }

    #[test]
    fn castling_rights_without_rook_are_dropped() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w KQ - 0 1").unwrap();
        assert!(board.castling().can_castle_kingside(Color::White));
        assert!(!board.castling().can_castle_queenside(Color::White));
        assert_eq!(board.to_fen(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    }

    #[test]
    fn en_passant_marks_the_double_stepped_pawn() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.en_passant(), Square::from_algebraic("e3").ok());
        assert!(board.piece_at(Square::new(4, 3)).unwrap().just_double_stepped);
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn en_passant_without_pawn_is_rejected() {
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - e3 0 1"),
            Err(ParseError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1"),
            Err(ParseError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn en_passant_through_occupied_squares_is_rejected() {
        // Skipped square taken.
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/4P3/4N3/8/4K3 b - e3 0 1"),
            Err(ParseError::InvalidEnPassantSquare(_))
        ));
        // Origin square taken.
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/4P3/8/4N3/4K3 b - e3 0 1"),
            Err(ParseError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn castling_rights_bits() {
        let mut rights = CastlingRights::ALL;
        rights.remove_for_rook_square(Color::White, Square::H1);
        assert!(!rights.can_castle_kingside(Color::White));
        assert!(rights.can_castle_queenside(Color::White));
        rights.remove_color(Color::Black);
        assert!(!rights.can_castle_kingside(Color::Black));
        assert!(!rights.can_castle_queenside(Color::Black));
        rights.remove_for_rook_square(Color::White, Square::E1);
        assert!(rights.can_castle_queenside(Color::White));
    }

    #[test]
    fn signature_ignores_clocks() {
        let a = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 37 60").unwrap();
        let c = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
        let d = Board::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 0 1").unwrap();
        assert_eq!(a.signature(), b.signature());
        assert_ne!(a.signature(), c.signature());
        assert_ne!(a.signature(), d.signature());
    }

    #[test]
    fn repetition_ledger() {
        let mut board = Board::startpos();
        assert_eq!(board.repetition_count(), 0);
        assert_eq!(board.record_position(), 1);
        assert_eq!(board.record_position(), 2);
        board.forget_position();
        assert_eq!(board.repetition_count(), 1);
        board.forget_position();
        assert_eq!(board.repetition_count(), 0);
    }
}
