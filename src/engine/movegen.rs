//! Move generation
//!
//! Geometry is computed directly on the 8x8 grid:
//! - Fixed offset tables for knights and kings
//! - Ray walking for sliding pieces (bishops, rooks, queens)
//! - Pawn pushes, captures, promotions and en passant
//! - Castling, validated with the same path check as sliding moves
//!
//! Legal moves are pseudo-legal candidates that survive being played on a
//! working copy without leaving the mover's king attacked.

use std::rc::Rc;

use crate::core::board::{CastleRole, ChessBoard, MoveTable};
use crate::core::coordinate::Coordinate;
use crate::core::moves::ChessMove;
use crate::core::piece::{ChessPiece, Color, PieceKind};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-1, -2),
    (-2, -1),
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Column the king starts on
const KING_HOME_COL: u8 = 4;

/// Move generator over [`ChessBoard`]s
pub struct MoveGen;

impl MoveGen {
    /// Squares `piece` on `source` could jump to with the fixed `offsets`,
    /// skipping squares held by its own side.
    fn jump_targets(
        board: &ChessBoard,
        source: Coordinate,
        color: Color,
        offsets: &[(i8, i8)],
        targets: &mut Vec<Coordinate>,
    ) {
        for &(d_row, d_col) in offsets {
            if let Some(target) = source.offset(d_row, d_col) {
                if board.piece_at(target).is_none_or(|p| p.color != color) {
                    targets.push(target);
                }
            }
        }
    }

    /// Walk each ray until the first occupied square, which is included
    /// when it holds an opposing piece.
    fn slide_targets(
        board: &ChessBoard,
        source: Coordinate,
        color: Color,
        directions: &[(i8, i8)],
        targets: &mut Vec<Coordinate>,
    ) {
        for &(d_row, d_col) in directions {
            let mut current = source;
            while let Some(next) = current.offset(d_row, d_col) {
                match board.piece_at(next) {
                    None => targets.push(next),
                    Some(p) => {
                        if p.color != color {
                            targets.push(next);
                        }
                        break;
                    }
                }
                current = next;
            }
        }
    }

    fn pawn_targets(
        board: &ChessBoard,
        source: Coordinate,
        color: Color,
        targets: &mut Vec<Coordinate>,
    ) {
        let dir = color.pawn_direction();

        if let Some(one) = source.offset(dir, 0) {
            if board.piece_at(one).is_none() {
                targets.push(one);
                if source.row() == color.pawn_start_row() {
                    if let Some(two) = source.offset(2 * dir, 0) {
                        if Self::is_path_clear(board, source, two) && board.piece_at(two).is_none()
                        {
                            targets.push(two);
                        }
                    }
                }
            }
        }

        for d_col in [-1, 1] {
            let Some(target) = source.offset(dir, d_col) else {
                continue;
            };
            match board.piece_at(target) {
                Some(p) if p.color != color => targets.push(target),
                Some(_) => {}
                None => {
                    if board.en_passant_file() == Some(target.col())
                        && source.row() == color.en_passant_row()
                    {
                        targets.push(target);
                    }
                }
            }
        }
    }

    /// True when every square strictly between `source` and `target` is
    /// empty. The two squares must share a rank, file or diagonal.
    pub fn is_path_clear(board: &ChessBoard, source: Coordinate, target: Coordinate) -> bool {
        let d_row = (target.row() as i8 - source.row() as i8).signum();
        let d_col = (target.col() as i8 - source.col() as i8).signum();
        let distance = source
            .row()
            .abs_diff(target.row())
            .max(source.col().abs_diff(target.col())) as i8;

        (1..distance).all(|step| {
            source
                .offset(d_row * step, d_col * step)
                .is_some_and(|sq| board.piece_at(sq).is_none())
        })
    }

    /// Castling targets for a king of `color` standing on `source`
    fn castling_targets(
        board: &ChessBoard,
        source: Coordinate,
        color: Color,
        targets: &mut Vec<Coordinate>,
    ) {
        let row = color.back_row();
        if source.row() != row
            || source.col() != KING_HOME_COL
            || board.has_moved(color, CastleRole::King)
            || board.in_check(color)
        {
            return;
        }

        let rook = Some(ChessPiece::new(PieceKind::Rook, color));
        let them = color.opposite();
        // (rook role, rook column, squares the king crosses and lands on)
        let sides = [
            (CastleRole::KingsRook, 7, [5, 6]),
            (CastleRole::QueensRook, 0, [3, 2]),
        ];

        for (role, rook_col, king_path) in sides {
            if board.has_moved(color, role) {
                continue;
            }
            let Some(rook_sq) = Coordinate::new(row, rook_col) else {
                continue;
            };
            if board.piece_at(rook_sq) != rook || !Self::is_path_clear(board, source, rook_sq) {
                continue;
            }
            let crossed: Vec<Coordinate> = king_path
                .iter()
                .filter_map(|&col| Coordinate::new(row, col))
                .collect();
            if crossed.iter().any(|&sq| Self::is_attacked(board, sq, them)) {
                continue;
            }
            if let Some(&landing) = crossed.last() {
                targets.push(landing);
            }
        }
    }

    /// Pseudo-legal target squares of the piece on `source`, including
    /// castling. Empty when the square is empty.
    pub fn piece_targets(board: &ChessBoard, source: Coordinate) -> Vec<Coordinate> {
        let mut targets = Vec::with_capacity(8);
        let Some(piece) = board.piece_at(source) else {
            return targets;
        };
        let color = piece.color;

        match piece.kind {
            PieceKind::Pawn => Self::pawn_targets(board, source, color, &mut targets),
            PieceKind::Knight => {
                Self::jump_targets(board, source, color, &KNIGHT_OFFSETS, &mut targets)
            }
            PieceKind::Bishop => {
                Self::slide_targets(board, source, color, &BISHOP_DIRECTIONS, &mut targets)
            }
            PieceKind::Rook => {
                Self::slide_targets(board, source, color, &ROOK_DIRECTIONS, &mut targets)
            }
            PieceKind::Queen => {
                Self::slide_targets(board, source, color, &ROOK_DIRECTIONS, &mut targets);
                Self::slide_targets(board, source, color, &BISHOP_DIRECTIONS, &mut targets);
            }
            PieceKind::King => {
                Self::jump_targets(board, source, color, &KING_OFFSETS, &mut targets);
                Self::castling_targets(board, source, color, &mut targets);
            }
        }
        targets
    }

    /// Check if `sq` is attacked by any piece of `by`.
    ///
    /// Looks outward from the square for each kind of attacker, which gives
    /// the same answer as generating every attacker's capture geometry.
    pub fn is_attacked(board: &ChessBoard, sq: Coordinate, by: Color) -> bool {
        let holds = |target: Option<Coordinate>, kinds: &[PieceKind]| {
            target
                .and_then(|t| board.piece_at(t))
                .is_some_and(|p| p.color == by && kinds.contains(&p.kind))
        };

        // A pawn of `by` attacks from one row behind its direction of travel
        let back = -by.pawn_direction();
        if holds(sq.offset(back, -1), &[PieceKind::Pawn])
            || holds(sq.offset(back, 1), &[PieceKind::Pawn])
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(r, c)| holds(sq.offset(r, c), &[PieceKind::Knight]))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&(r, c)| holds(sq.offset(r, c), &[PieceKind::King]))
        {
            return true;
        }

        let ray_hits = |directions: &[(i8, i8)], kinds: &[PieceKind]| {
            directions.iter().any(|&(d_row, d_col)| {
                let mut current = sq;
                while let Some(next) = current.offset(d_row, d_col) {
                    if board.piece_at(next).is_some() {
                        return holds(Some(next), kinds);
                    }
                    current = next;
                }
                false
            })
        };

        ray_hits(&ROOK_DIRECTIONS, &[PieceKind::Rook, PieceKind::Queen])
            || ray_hits(&BISHOP_DIRECTIONS, &[PieceKind::Bishop, PieceKind::Queen])
    }

    /// Pseudo-legal moves for the side to move, sources in row-major order.
    /// A pawn reaching the last row yields one move per promotion kind.
    pub fn generate_candidates(board: &ChessBoard) -> Vec<(ChessMove, ChessPiece)> {
        let us = board.side_to_move();
        let mut candidates = Vec::with_capacity(48);

        for source in Coordinate::all() {
            let Some(piece) = board.piece_at(source).filter(|p| p.color == us) else {
                continue;
            };
            for target in Self::piece_targets(board, source) {
                if piece.kind == PieceKind::Pawn && target.row() == us.promotion_row() {
                    for kind in PieceKind::PROMOTIONS {
                        candidates.push((ChessMove::with_promotion(source, target, kind), piece));
                    }
                } else {
                    candidates.push((ChessMove::new(source, target), piece));
                }
            }
        }
        candidates
    }

    /// Play a candidate on a working copy; `None` if it leaves the mover in check.
    fn try_candidate(board: &ChessBoard, mv: &ChessMove, piece: ChessPiece) -> Option<ChessBoard> {
        let mut next = board.clone();
        next.apply_unchecked(mv, piece);
        (!next.in_check(piece.color)).then_some(next)
    }

    /// Generate all legal moves with their resulting boards
    pub fn generate_legal(board: &ChessBoard) -> MoveTable {
        Self::generate_candidates(board)
            .into_iter()
            .filter_map(|(mv, piece)| {
                Self::try_candidate(board, &mv, piece).map(|next| (mv, Rc::new(next)))
            })
            .collect()
    }

    /// True if any candidate is legal; stops at the first one found
    pub fn has_legal_move(board: &ChessBoard) -> bool {
        Self::generate_candidates(board)
            .iter()
            .any(|(mv, piece)| Self::try_candidate(board, mv, *piece).is_some())
    }
}
