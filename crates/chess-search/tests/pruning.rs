//! Alpha-beta must agree with plain minimax on every position.

use chess_engine::{legal_moves, Board};
use chess_search::{SearchConfig, Searcher, INF};
use proptest::prelude::*;
use proptest::sample::Index;

fn reachable_board(choices: &[Index]) -> Board {
    let mut board = Board::startpos();
    for choice in choices {
        let moves = legal_moves(&mut board);
        if moves.is_empty() {
            break;
        }
        board.apply(moves[choice.index(moves.len())]);
    }
    board
}

fn check_agreement(board: &mut Board, depth: u32, terminal_at_horizon: bool) -> Result<(), TestCaseError> {
    let mut searcher = Searcher::new(SearchConfig {
        depth,
        terminal_at_horizon,
    });
    for maximizing in [true, false] {
        let full = searcher.minimax(board, depth, maximizing);
        let full_nodes = searcher.nodes();
        let pruned = searcher.alpha_beta(board, depth, -INF, INF, maximizing);
        prop_assert_eq!(pruned, full, "fen {}", board.to_fen());
        prop_assert!(searcher.nodes() <= full_nodes);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn alpha_beta_equals_minimax_depth_2(
        choices in prop::collection::vec(any::<Index>(), 0..30),
        terminal_at_horizon in any::<bool>(),
    ) {
        let mut board = reachable_board(&choices);
        check_agreement(&mut board, 2, terminal_at_horizon)?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn alpha_beta_equals_minimax_depth_3(
        choices in prop::collection::vec(any::<Index>(), 0..20),
    ) {
        let mut board = reachable_board(&choices);
        check_agreement(&mut board, 3, false)?;
    }

    #[test]
    fn best_move_score_is_the_minimax_value(
        choices in prop::collection::vec(any::<Index>(), 0..20),
    ) {
        let mut board = reachable_board(&choices);
        prop_assume!(!legal_moves(&mut board).is_empty());

        let mut searcher = Searcher::new(SearchConfig { depth: 2, ..SearchConfig::default() });
        let outcome = searcher.search(&mut board).unwrap();
        let value = searcher.minimax(&mut board, 2, true);
        prop_assert_eq!(outcome.score, value);
    }
}
