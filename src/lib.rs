pub mod console;
pub mod core;
pub mod engine;
pub mod error;

pub use crate::core::{ChessBoard, ChessMove, ChessPiece, Color, Coordinate, PieceKind};
pub use engine::search::{Evaluator, EvaluatorConfig};
pub use engine::perft::perft;
pub use error::{ChessError, FormatError, Result};
