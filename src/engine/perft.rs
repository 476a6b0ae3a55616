//! Perft: count the leaf nodes of the full-width move tree.

use crate::core::board::ChessBoard;

/// Number of move sequences of length `depth` from `board`
pub fn perft(board: &ChessBoard, depth: u32) -> u64 {
    match depth {
        0 => 1,
        1 => board.successors().len() as u64,
        _ => board
            .successors()
            .iter()
            .map(|(_, next)| perft(next, depth - 1))
            .sum(),
    }
}

/// Perft split by root move, in generation order
pub fn divide(board: &ChessBoard, depth: u32) -> Vec<(String, u64)> {
    board
        .successors()
        .iter()
        .map(|(mv, next)| (mv.to_string(), perft(next, depth.saturating_sub(1))))
        .collect()
}
