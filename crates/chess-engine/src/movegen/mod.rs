//! Move generation.
//!
//! Pseudo-legal moves are produced per piece through a table of generator
//! functions indexed by [`PieceKind`]. Legal moves are the pseudo-legal ones
//! that do not leave the mover's king attacked, checked by making and
//! unmaking each candidate on the board itself.

pub mod perft;

use crate::{Board, Move, Piece, PieceId};
use chess_core::{Color, MoveKind, PieceKind, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves the list can hold.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

type Generator = fn(&Board, &Piece, &mut MoveList);

/// Pseudo-legal generators, indexed by [`PieceKind::index`].
const GENERATORS: [Generator; 6] = [
    generate_pawn_moves,
    generate_knight_moves,
    generate_bishop_moves,
    generate_rook_moves,
    generate_queen_moves,
    generate_king_moves,
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Generates pseudo-legal moves for one piece.
pub fn pseudo_legal_moves_for(board: &Board, piece: &Piece, moves: &mut MoveList) {
    GENERATORS[piece.kind.index()](board, piece, moves);
}

/// Generates pseudo-legal moves for every piece of the side to move.
pub fn pseudo_legal_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();
    for piece in board.pieces_of(board.side_to_move()) {
        pseudo_legal_moves_for(board, piece, &mut moves);
    }
    moves
}

/// Generates all legal moves for the side to move.
pub fn legal_moves(board: &mut Board) -> MoveList {
    let mut moves = pseudo_legal_moves(board);
    retain_legal(board, &mut moves);
    moves
}

/// Legal destination squares of a single piece.
///
/// Empty when the piece is captured or does not belong to the side to move.
pub fn legal_destinations(board: &mut Board, id: PieceId) -> Vec<Square> {
    let piece = *board.piece(id);
    if piece.captured || piece.color != board.side_to_move() {
        return Vec::new();
    }
    let mut moves = MoveList::new();
    pseudo_legal_moves_for(board, &piece, &mut moves);
    retain_legal(board, &mut moves);
    moves.iter().map(|m| m.to).collect()
}

/// Legal destinations of every piece of the side to move, in arena order.
///
/// Pieces without a legal move are omitted.
pub fn legal_moves_grouped(board: &mut Board) -> Vec<(PieceId, Vec<Square>)> {
    let mut grouped: Vec<(PieceId, Vec<Square>)> = Vec::new();
    for m in &legal_moves(board) {
        match grouped.last_mut() {
            Some((id, squares)) if *id == m.piece => squares.push(m.to),
            _ => grouped.push((m.piece, vec![m.to])),
        }
    }
    grouped
}

fn retain_legal(board: &mut Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    moves.retain(|m| {
        let undo = board.apply(*m);
        let safe = !is_attacked(board, board.king(us).square, us.opposite());
        board.unmake(undo);
        safe
    });
}

/// Returns true if the side to move is in check.
pub fn in_check(board: &Board) -> bool {
    let us = board.side_to_move();
    is_attacked(board, board.king(us).square, us.opposite())
}

/// Returns true if the side to move is checkmated.
pub fn is_checkmate(board: &mut Board) -> bool {
    in_check(board) && legal_moves(board).is_empty()
}

/// Returns true if the side to move has no legal move but is not in check.
pub fn is_stalemate(board: &mut Board) -> bool {
    !in_check(board) && legal_moves(board).is_empty()
}

/// Returns true if any piece of color `by` attacks `sq`.
///
/// Uses attack patterns only: pawns attack their capture diagonals whether or
/// not anything stands there, and pins are ignored.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let is = |target: Option<Square>, kinds: &[PieceKind]| {
        target
            .and_then(|t| board.piece_at(t))
            .is_some_and(|p| p.color == by && kinds.contains(&p.kind))
    };

    // A pawn of `by` attacks `sq` from one rank behind it.
    let back = -by.pawn_direction();
    if is(sq.offset(-1, back), &[PieceKind::Pawn]) || is(sq.offset(1, back), &[PieceKind::Pawn]) {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| is(sq.offset(df, dr), &[PieceKind::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| is(sq.offset(df, dr), &[PieceKind::King]))
    {
        return true;
    }

    let ray_hits = |directions: &[(i8, i8)], kinds: &[PieceKind]| {
        directions.iter().any(|&(df, dr)| {
            let mut current = sq.offset(df, dr);
            while let Some(t) = current {
                if let Some(p) = board.piece_at(t) {
                    return p.color == by && kinds.contains(&p.kind);
                }
                current = t.offset(df, dr);
            }
            false
        })
    };

    ray_hits(&ROOK_DIRECTIONS, &[PieceKind::Rook, PieceKind::Queen])
        || ray_hits(&BISHOP_DIRECTIONS, &[PieceKind::Bishop, PieceKind::Queen])
}

/// Classifies `to` for a non-pawn mover.
///
/// Returns `None` if the square holds a friendly piece or the enemy king,
/// otherwise the captured piece, if any.
#[inline]
fn target(board: &Board, piece: &Piece, to: Square) -> Option<Option<PieceId>> {
    match board.piece_at(to) {
        None => Some(None),
        Some(other) if other.color != piece.color && other.kind != PieceKind::King => {
            Some(Some(other.id))
        }
        Some(_) => None,
    }
}

#[inline]
fn push_move(moves: &mut MoveList, piece: &Piece, to: Square, captured: Option<PieceId>, kind: MoveKind) {
    moves.push(Move {
        piece: piece.id,
        from: piece.square,
        to,
        captured,
        kind,
    });
}

fn generate_pawn_moves(board: &Board, piece: &Piece, moves: &mut MoveList) {
    let dir = piece.color.pawn_direction();
    let promotion_rank = piece.color.promotion_rank();
    let advance_kind = |to: Square| {
        if to.rank() == promotion_rank {
            MoveKind::Promotion
        } else {
            MoveKind::Normal
        }
    };

    if let Some(one) = piece.square.offset(0, dir) {
        if board.piece_at(one).is_none() {
            push_move(moves, piece, one, None, advance_kind(one));

            if !piece.has_moved && piece.square.rank() == piece.color.pawn_rank() {
                if let Some(two) = one.offset(0, dir) {
                    if board.piece_at(two).is_none() {
                        push_move(moves, piece, two, None, MoveKind::DoublePawnStep);
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = piece.square.offset(df, dir) else {
            continue;
        };
        match board.piece_at(to) {
            Some(other) if other.color != piece.color && other.kind != PieceKind::King => {
                push_move(moves, piece, to, Some(other.id), advance_kind(to));
            }
            Some(_) => {}
            None if board.en_passant() == Some(to) => {
                let passed = to
                    .offset(0, -dir)
                    .and_then(|sq| board.piece_at(sq))
                    .filter(|p| {
                        p.kind == PieceKind::Pawn
                            && p.color != piece.color
                            && p.just_double_stepped
                    });
                if let Some(passed) = passed {
                    push_move(moves, piece, to, Some(passed.id), MoveKind::EnPassantCapture);
                }
            }
            None => {}
        }
    }
}

fn generate_knight_moves(board: &Board, piece: &Piece, moves: &mut MoveList) {
    generate_steps(board, piece, &KNIGHT_OFFSETS, moves);
}

fn generate_bishop_moves(board: &Board, piece: &Piece, moves: &mut MoveList) {
    generate_slides(board, piece, &BISHOP_DIRECTIONS, moves);
}

fn generate_rook_moves(board: &Board, piece: &Piece, moves: &mut MoveList) {
    generate_slides(board, piece, &ROOK_DIRECTIONS, moves);
}

fn generate_queen_moves(board: &Board, piece: &Piece, moves: &mut MoveList) {
    generate_slides(board, piece, &ROOK_DIRECTIONS, moves);
    generate_slides(board, piece, &BISHOP_DIRECTIONS, moves);
}

fn generate_king_moves(board: &Board, piece: &Piece, moves: &mut MoveList) {
    generate_steps(board, piece, &KING_OFFSETS, moves);
    generate_castling_moves(board, piece, moves);
}

fn generate_steps(board: &Board, piece: &Piece, offsets: &[(i8, i8)], moves: &mut MoveList) {
    for &(df, dr) in offsets {
        if let Some(to) = piece.square.offset(df, dr) {
            if let Some(captured) = target(board, piece, to) {
                push_move(moves, piece, to, captured, MoveKind::Normal);
            }
        }
    }
}

fn generate_slides(board: &Board, piece: &Piece, directions: &[(i8, i8)], moves: &mut MoveList) {
    for &(df, dr) in directions {
        let mut current = piece.square.offset(df, dr);
        while let Some(to) = current {
            match target(board, piece, to) {
                Some(None) => push_move(moves, piece, to, None, MoveKind::Normal),
                Some(captured) => {
                    push_move(moves, piece, to, captured, MoveKind::Normal);
                    break;
                }
                None => break,
            }
            current = to.offset(df, dr);
        }
    }
}

fn generate_castling_moves(board: &Board, king: &Piece, moves: &mut MoveList) {
    let us = king.color;
    let them = us.opposite();
    let rank = us.back_rank();

    if king.has_moved || king.square != Square::new(4, rank) {
        return;
    }

    let rights = board.castling();
    let candidates = [
        (
            rights.can_castle_kingside(us),
            7,
            &[5u8, 6][..],
            &[4u8, 5, 6][..],
            MoveKind::ShortCastle,
            6,
        ),
        (
            rights.can_castle_queenside(us),
            0,
            &[1u8, 2, 3][..],
            &[4u8, 3, 2][..],
            MoveKind::LongCastle,
            2,
        ),
    ];

    let mut checked = None;
    for (allowed, rook_file, between, king_path, kind, king_to) in candidates {
        if !allowed {
            continue;
        }
        let rook_ok = board
            .piece_at(Square::new(rook_file, rank))
            .is_some_and(|r| r.kind == PieceKind::Rook && r.color == us && !r.has_moved);
        if !rook_ok {
            continue;
        }
        if between
            .iter()
            .any(|&file| board.piece_at(Square::new(file, rank)).is_some())
        {
            continue;
        }
        let king_attacked = *checked.get_or_insert_with(|| is_attacked(board, king.square, them));
        if king_attacked {
            return;
        }
        if king_path
            .iter()
            .skip(1)
            .any(|&file| is_attacked(board, Square::new(file, rank), them))
        {
            continue;
        }
        push_move(moves, king, Square::new(king_to, rank), None, kind);
    }
}
