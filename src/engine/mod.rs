//! Chess engine components
//!
//! This module contains the core engine functionality:
//! - Move generation and attack detection
//! - Material evaluation
//! - Fixed-depth minimax search
//! - Perft node counting

pub mod eval;
pub mod movegen;
pub mod perft;
pub mod search;

pub use eval::{material, static_value, TERMINAL_SCORE};
pub use movegen::MoveGen;
pub use perft::{divide, perft};
pub use search::{EvaluatedMove, EvaluatedMoves, Evaluator, EvaluatorConfig, SearchStats};
