//! Search: full-width move tree, minimax propagation, move selection.

mod evaluator;
mod tree;
mod types;

pub use evaluator::Evaluator;
pub use tree::{EvaluatedMove, EvaluatedMoves};
pub use types::{EvaluatorConfig, SearchStats, DEFAULT_DEPTH};
