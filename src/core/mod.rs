//! Core chess types and representations
//!
//! This module contains the fundamental building blocks of the engine:
//! - Squares and moves
//! - Pieces and colors
//! - Board state, move application and check flags
//! - Compact position keys

pub mod board;
pub mod coordinate;
pub mod key;
pub mod moves;
pub mod piece;

pub use board::{CastleRole, ChessBoard, Grid, MoveTable, MovedFlags};
pub use coordinate::Coordinate;
pub use moves::ChessMove;
pub use piece::{ChessPiece, Color, PieceKind};
