//! Move tree: one [`EvaluatedMoves`] layer per expanded position, one
//! [`EvaluatedMove`] per legal move in it.
//!
//! Layers own their moves and each move owns the layer below it, so the
//! tree is dropped as a whole once the search returns. Values flow
//! bottom-up through [`EvaluatedMoves::populate_final_best_values`].

use std::ops::Index;
use std::rc::Rc;

use tracing::trace;

use crate::core::board::ChessBoard;
use crate::core::moves::ChessMove;
use crate::core::piece::Color;

pub struct EvaluatedMove {
    mv: ChessMove,
    resulting_state: Rc<ChessBoard>,
    next: Option<EvaluatedMoves>,
}

impl EvaluatedMove {
    pub fn new(mv: ChessMove, resulting_state: Rc<ChessBoard>) -> Self {
        EvaluatedMove {
            mv,
            resulting_state,
            next: None,
        }
    }

    #[inline]
    pub fn chess_move(&self) -> &ChessMove {
        &self.mv
    }

    #[inline]
    pub fn resulting_state(&self) -> &ChessBoard {
        &self.resulting_state
    }

    /// Replies to this move, when the search expanded it
    #[inline]
    pub fn next(&self) -> Option<&EvaluatedMoves> {
        self.next.as_ref()
    }

    pub fn set_next(&mut self, next: EvaluatedMoves) {
        self.next = Some(next);
    }

    /// Minimax value of this move.
    ///
    /// The resulting board's static value for unexpanded moves; otherwise
    /// the value propagated into the reply layer, or `None` before
    /// propagation has run.
    pub fn final_value(&self) -> Option<i32> {
        match &self.next {
            None => Some(self.resulting_state.board_value()),
            Some(next) => next.final_best_value(),
        }
    }
}

pub struct EvaluatedMoves {
    side_to_move: Color,
    moves: Vec<EvaluatedMove>,
    /// Static value of the prior position, kept only when it has no moves
    terminal_value: Option<i32>,
    final_best_value: Option<i32>,
}

impl EvaluatedMoves {
    /// One layer of moves from `prior_state`, without replies
    pub fn new(prior_state: &ChessBoard) -> Self {
        let moves: Vec<EvaluatedMove> = prior_state
            .successors()
            .iter()
            .map(|(mv, next)| EvaluatedMove::new(*mv, Rc::clone(next)))
            .collect();
        let terminal_value = moves.is_empty().then(|| prior_state.board_value());

        EvaluatedMoves {
            side_to_move: prior_state.side_to_move(),
            moves,
            terminal_value,
            final_best_value: None,
        }
    }

    /// Expand `prior_state` to `depth` plies. Moves on the last ply get no
    /// reply layer; a depth of 0 still expands the first ply.
    pub fn build(prior_state: &ChessBoard, depth: u32) -> Self {
        let mut layer = EvaluatedMoves::new(prior_state);
        if depth > 1 {
            for mv in &mut layer.moves {
                let next = EvaluatedMoves::build(&mv.resulting_state, depth - 1);
                mv.set_next(next);
            }
        }
        trace!(depth, moves = layer.moves.len(), "expanded layer");
        layer
    }

    /// Side choosing among these moves
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvaluatedMove> {
        self.moves.iter()
    }

    /// Best value for the side to move, once propagated
    #[inline]
    pub fn final_best_value(&self) -> Option<i32> {
        self.final_best_value
    }

    /// Number of static evaluations the minimax pass will make
    pub fn leaf_count(&self) -> usize {
        if self.moves.is_empty() {
            return 1;
        }
        self.moves
            .iter()
            .map(|mv| mv.next.as_ref().map_or(1, EvaluatedMoves::leaf_count))
            .sum()
    }

    /// Number of layers in this subtree, this one included
    pub fn layer_count(&self) -> usize {
        1 + self
            .moves
            .iter()
            .filter_map(|mv| mv.next.as_ref())
            .map(EvaluatedMoves::layer_count)
            .sum::<usize>()
    }

    /// Compute and store the minimax value of every layer in the subtree.
    ///
    /// White maximizes, black minimizes. A layer without moves takes its
    /// position's static value. `on_leaf` runs once per static evaluation.
    pub fn populate_final_best_values(&mut self, on_leaf: &mut dyn FnMut()) -> i32 {
        let maximize = self.side_to_move == Color::White;
        let mut best: Option<i32> = None;

        for mv in &mut self.moves {
            let value = match &mut mv.next {
                None => {
                    on_leaf();
                    mv.resulting_state.board_value()
                }
                Some(next) => next.populate_final_best_values(on_leaf),
            };
            best = Some(match best {
                None => value,
                Some(b) if maximize => b.max(value),
                Some(b) => b.min(value),
            });
        }

        let value = match (best, self.terminal_value) {
            (Some(b), _) => b,
            (None, Some(terminal)) => {
                on_leaf();
                terminal
            }
            (None, None) => 0,
        };
        self.final_best_value = Some(value);
        value
    }
}

impl Index<usize> for EvaluatedMoves {
    type Output = EvaluatedMove;
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a EvaluatedMoves {
    type Item = &'a EvaluatedMove;
    type IntoIter = std::slice::Iter<'a, EvaluatedMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
