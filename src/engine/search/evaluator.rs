//! Evaluator: builds the move tree, runs minimax and picks the move to play.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::board::ChessBoard;
use crate::core::moves::ChessMove;

use super::tree::{EvaluatedMove, EvaluatedMoves};
use super::types::{EvaluatorConfig, SearchStats};

pub struct Evaluator {
    config: EvaluatorConfig,
    rng: StdRng,
    stats: SearchStats,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Evaluator {
            config,
            rng,
            stats: SearchStats::default(),
        }
    }

    /// Evaluator with the default depth and a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(EvaluatorConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.config.depth = depth;
    }

    /// Counters from the last search
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Best move at the configured depth
    pub fn search(&mut self, board: &ChessBoard) -> Option<ChessMove> {
        self.get_best_move(board, self.config.depth)
    }

    /// Best move for the side to move, looking `depth` plies ahead.
    ///
    /// `None` when the side to move has no legal move; check
    /// [`ChessBoard::is_check`] to tell checkmate from stalemate.
    pub fn get_best_move(&mut self, board: &ChessBoard, depth: u32) -> Option<ChessMove> {
        self.get_best_move_with_progress(board, depth, &mut |_, _| {})
    }

    /// Like [`Evaluator::get_best_move`], calling `progress(current, total)`
    /// once per static evaluation of the minimax pass.
    pub fn get_best_move_with_progress(
        &mut self,
        board: &ChessBoard,
        depth: u32,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Option<ChessMove> {
        let depth = depth.max(1);
        self.stats = SearchStats::default();

        let mut root = EvaluatedMoves::build(board, depth);
        if root.is_empty() {
            debug!(depth, "no legal moves");
            return None;
        }

        let total = root.leaf_count();
        let mut current = 0;
        let best = root.populate_final_best_values(&mut || {
            current += 1;
            progress(current, total);
        });

        let mut candidates: Vec<&EvaluatedMove> = root
            .iter()
            .filter(|mv| mv.final_value() == Some(best))
            .collect();

        // Prefer the move that also looks best one ply deep, then the
        // earliest source square; ties beyond that are broken at random.
        let blacks_turn = board.is_blacks_turn();
        let sort_key = |mv: &EvaluatedMove| {
            let value = mv.resulting_state().board_value();
            let value = if blacks_turn { value } else { -value };
            (value, mv.chess_move().source.index())
        };
        candidates.sort_by_key(|mv| sort_key(mv));

        let lead = sort_key(candidates[0]);
        let block = candidates
            .iter()
            .take_while(|mv| sort_key(mv) == lead)
            .count();
        let chosen = *candidates[self.rng.random_range(0..block)].chess_move();

        self.stats = SearchStats {
            layers: root.layer_count(),
            leaves: total,
            candidates: candidates.len(),
            best_value: Some(best),
        };
        debug!(
            depth,
            leaves = total,
            best,
            candidates = candidates.len(),
            tied = block,
            chosen = %chosen,
            "search finished"
        );

        Some(chosen)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}
