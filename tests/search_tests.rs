use std::rc::Rc;

use ben_chess::core::board::ChessBoard;
use ben_chess::core::coordinate::Coordinate;
use ben_chess::core::moves::ChessMove;
use ben_chess::engine::eval::TERMINAL_SCORE;
use ben_chess::engine::search::{EvaluatedMoves, Evaluator, EvaluatorConfig};

fn play_all(moves: &[&str]) -> Rc<ChessBoard> {
    let mut board = Rc::new(ChessBoard::new_game());
    for mv in moves {
        board = board.play(mv).unwrap();
    }
    board
}

fn mv(text: &str) -> ChessMove {
    text.parse().unwrap()
}

#[test]
fn test_search_startpos() {
    let board = ChessBoard::new_game();
    let mut evaluator = Evaluator::seeded(7);
    let best = evaluator.get_best_move(&board, 2);
    assert!(best.is_some_and(|m| board.valid_moves().contains(&m)));

    let stats = evaluator.stats();
    assert_eq!(stats.leaves, 400);
    assert_eq!(stats.layers, 21);
    assert_eq!(stats.candidates, 20);
    assert_eq!(stats.best_value, Some(0));
}

#[test]
fn test_search_ties_prefer_earliest_source() {
    // Every move is level, so the pick comes from the first white piece in
    // row-major order: the a2 pawn.
    let board = ChessBoard::new_game();
    let a2: Coordinate = "a2".parse().unwrap();
    for seed in 0..8 {
        let best = Evaluator::seeded(seed).get_best_move(&board, 2).unwrap();
        assert_eq!(best.source, a2);
    }
}

#[test]
fn test_search_seeded_is_deterministic() {
    let board = play_all(&["e2-e4", "e7-e5", "g1-f3"]);
    let first = Evaluator::seeded(42).get_best_move(&board, 2);
    let second = Evaluator::seeded(42).get_best_move(&board, 2);
    assert_eq!(first, second);
}

#[test]
fn test_search_single_legal_move() {
    let board = ChessBoard::parse(" r     k\n\n\n\n\n   P\n       r\nK\n").unwrap();
    assert_eq!(board.valid_moves(), vec![mv("d3-d4")]);
    let mut evaluator = Evaluator::seeded(1);
    for depth in 1..=3 {
        assert_eq!(evaluator.get_best_move(&board, depth), Some(mv("d3-d4")));
    }
}

#[test]
fn test_search_mate_in_one() {
    let board = play_all(&["e2-e4", "f7-f6", "d2-d4", "g7-g5"]);
    let mut evaluator = Evaluator::seeded(3);
    assert_eq!(evaluator.get_best_move(&board, 1), Some(mv("d1-h5")));
    assert_eq!(evaluator.stats().best_value, Some(TERMINAL_SCORE));
    assert_eq!(evaluator.get_best_move(&board, 2), Some(mv("d1-h5")));
}

#[test]
fn test_search_wins_material() {
    let board = ChessBoard::parse("q      k\n\n\n\n\n\n\nR   K\n").unwrap();
    let mut evaluator = Evaluator::seeded(5);
    assert_eq!(evaluator.get_best_move(&board, 1), Some(mv("a1-a8")));
    assert_eq!(evaluator.get_best_move(&board, 2), Some(mv("a1-a8")));
}

#[test]
fn test_search_black_minimizes() {
    let board = play_all(&["e2-e4", "d7-d5", "d1-g4"]);
    assert!(board.is_blacks_turn());
    let mut evaluator = Evaluator::seeded(9);
    assert_eq!(evaluator.get_best_move(&board, 1), Some(mv("c8-g4")));
    assert_eq!(evaluator.stats().best_value, Some(-9));
}

#[test]
fn test_search_no_moves() {
    let board = play_all(&["f2-f3", "e7-e5", "g2-g4", "d8-h4"]);
    let mut evaluator = Evaluator::seeded(0);
    assert_eq!(evaluator.get_best_move(&board, 3), None);
    assert!(board.is_check());
}

#[test]
fn test_search_depth_zero_is_one_ply() {
    let board = ChessBoard::new_game();
    let mut evaluator = Evaluator::seeded(11);
    assert!(evaluator.get_best_move(&board, 0).is_some());
    assert_eq!(evaluator.stats().layers, 1);
    assert_eq!(evaluator.stats().leaves, 20);
}

#[test]
fn test_search_progress_reports_every_leaf() {
    let board = play_all(&["e2-e4", "e7-e5"]);
    let mut evaluator = Evaluator::seeded(2);
    let mut calls = Vec::new();
    let best = evaluator.get_best_move_with_progress(&board, 2, &mut |current, total| {
        calls.push((current, total));
    });
    assert!(best.is_some());

    let total = evaluator.stats().leaves;
    assert_eq!(calls.len(), total);
    assert_eq!(calls.first(), Some(&(1, total)));
    assert_eq!(calls.last(), Some(&(total, total)));
    assert!(calls.windows(2).all(|w| w[1].0 == w[0].0 + 1));
}

#[test]
fn test_search_uses_configured_depth() {
    let board = ChessBoard::new_game();
    let mut evaluator = Evaluator::new(EvaluatorConfig {
        depth: 1,
        seed: Some(4),
    });
    assert!(evaluator.search(&board).is_some());
    assert_eq!(evaluator.stats().leaves, 20);

    evaluator.set_depth(2);
    evaluator.search(&board);
    assert_eq!(evaluator.stats().leaves, 400);
}

#[test]
fn test_tree_values_match_search() {
    let board = play_all(&["e2-e4", "f7-f6", "d2-d4", "g7-g5"]);
    let mut tree = EvaluatedMoves::build(&board, 2);
    let best = tree.populate_final_best_values(&mut || {});
    assert_eq!(best, TERMINAL_SCORE);
    assert_eq!(tree.final_best_value(), Some(TERMINAL_SCORE));

    let mate = tree
        .iter()
        .find(|m| *m.chess_move() == mv("d1-h5"))
        .unwrap();
    assert!(mate.next().is_some_and(|replies| replies.is_empty()));
    assert_eq!(mate.final_value(), Some(TERMINAL_SCORE));
}
