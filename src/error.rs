//! Error types for board parsing, move lookup and move application.

use thiserror::Error;

use crate::core::coordinate::Coordinate;
use crate::core::piece::Color;

/// Malformed text input: board text, unique keys, squares or moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The board text ended before every square was read
    #[error("expected row {row}, column {col} at string index {index}, but found end of string")]
    UnexpectedEnd { row: usize, col: usize, index: usize },

    /// A board row holds more than eight squares
    #[error("expected row {row} to be terminated by a newline")]
    UnterminatedRow { row: usize },

    /// A character that does not name a piece
    #[error("unknown piece code {0:?}")]
    UnknownPiece(char),

    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),

    #[error("invalid move text {0:?}")]
    InvalidMove(String),

    #[error("invalid board key: {0}")]
    InvalidKey(String),
}

/// Errors surfaced by board operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The move is well formed but not in the position's legal move table
    #[error("{0} is not a valid move")]
    IllegalMove(String),

    /// Attempted to move from a square without a piece
    #[error("attempted to move from {square}, which holds no piece")]
    EmptySource { square: Coordinate },

    /// Attempted to move a piece of the side not on turn
    #[error("attempted to move the piece on {square} during {side_to_move}'s turn")]
    WrongTurn {
        square: Coordinate,
        side_to_move: Color,
    },
}

impl ChessError {
    /// True for errors raised by internal move application, which only
    /// happen when the legality filter was bypassed.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            ChessError::EmptySource { .. } | ChessError::WrongTurn { .. }
        )
    }
}

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, ChessError>;
