//! Search configuration and stats.

/// Plies searched when no depth is given
pub const DEFAULT_DEPTH: u32 = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Plies to expand; 0 is treated as 1
    pub depth: u32,
    /// Seed for tie-breaking; drawn from the OS when `None`
    pub seed: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            seed: None,
        }
    }
}

/// Counters from the most recent search
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Expanded positions, including the root
    pub layers: usize,
    /// Static evaluations fed into the minimax pass
    pub leaves: usize,
    /// Root moves sharing the best minimax value
    pub candidates: usize,
    pub best_value: Option<i32>,
}
