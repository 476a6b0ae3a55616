//! Static evaluation: material count, with a fixed score for positions
//! where the side to move has no legal move.

use crate::core::board::ChessBoard;
use crate::core::piece::Color;

/// Score of a position in which the side to move cannot move
pub const TERMINAL_SCORE: i32 = 9999;

/// White material minus black material (P=1, N=3, B=3, R=5, Q=9)
pub fn material(board: &ChessBoard) -> i32 {
    board
        .grid()
        .iter()
        .flatten()
        .flatten()
        .map(|piece| piece.color.sign() * piece.kind.value())
        .sum()
}

/// Value of `board` from white's point of view.
///
/// When the side to move has no legal move the result is
/// `TERMINAL_SCORE` in white's favour if black is stuck and in black's
/// favour if white is, whether or not the stuck side is in check.
pub fn static_value(board: &ChessBoard) -> i32 {
    if board.has_legal_moves() {
        material(board)
    } else {
        match board.side_to_move() {
            Color::Black => TERMINAL_SCORE,
            Color::White => -TERMINAL_SCORE,
        }
    }
}
