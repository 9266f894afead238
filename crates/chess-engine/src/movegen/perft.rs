//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Promotions always produce a queen here, so reference counts only match
//! for depths that reach no promotion.

use super::legal_moves;
use crate::Board;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        board.push(*m);
        nodes += perft(board, depth - 1);
        board.pop();
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let moves = legal_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        board.push(*m);
        let nodes = if depth > 1 {
            perft(board, depth - 1)
        } else {
            1
        };
        board.pop();
        results.push((m.to_string(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn perft_startpos() {
        let mut board = Board::startpos();
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(perft(&mut board, 3), 8902);
    }

    #[test]
    #[ignore]
    fn perft_startpos_depth_4() {
        let mut board = Board::startpos();
        assert_eq!(perft(&mut board, 4), 197281);
    }

    // Kiwipete - a position with lots of special moves
    #[test]
    fn perft_kiwipete() {
        let mut board = Board::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&mut board, 1), 48);
        assert_eq!(perft(&mut board, 2), 2039);
    }

    #[test]
    #[ignore]
    fn perft_kiwipete_depth_3() {
        let mut board = Board::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&mut board, 3), 97862);
    }

    // Position 3: check evasion, en passant and discovered checks
    #[test]
    fn perft_position3() {
        let mut board = Board::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&mut board, 1), 14);
        assert_eq!(perft(&mut board, 2), 191);
        assert_eq!(perft(&mut board, 3), 2812);
    }

    #[test]
    fn perft_restores_board() {
        let mut board = Board::from_fen(KIWIPETE).unwrap();
        let before = board.clone();
        perft(&mut board, 2);
        assert_eq!(board, before);
    }

    #[test]
    fn perft_divide_works() {
        let mut board = Board::startpos();
        let results = perft_divide(&mut board, 2);
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
    }
}
