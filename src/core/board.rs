//! Chess board representation
//!
//! A [`ChessBoard`] is an 8x8 grid of optional pieces plus the side to move,
//! the castling bookkeeping, both check flags and the en passant file.
//! Boards are never changed once handed out: moves are applied to a private
//! working copy, which is then published as a new board. Each board lazily
//! memoizes its legal move table and its static value.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use super::coordinate::Coordinate;
use super::key;
use super::moves::ChessMove;
use super::piece::{square_char, ChessPiece, Color, PieceKind};
use crate::engine::eval;
use crate::engine::movegen::MoveGen;
use crate::error::{ChessError, FormatError, Result};

const NEW_GAME: &str = "rnbqkbnr\npppppppp\n\n\n\n\nPPPPPPPP\nRNBQKBNR";

/// Grid of squares indexed `[row][col]`
pub type Grid = [[Option<ChessPiece>; 8]; 8];

/// Legal moves of a position, in generation order, each with the board it produces
pub type MoveTable = Vec<(ChessMove, Rc<ChessBoard>)>;

/// The pieces whose movement forfeits castling
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastleRole {
    KingsRook,
    QueensRook,
    King,
}

/// Castling bookkeeping: one "has moved" bit per color and role.
///
/// Bits are only ever set, never cleared.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MovedFlags(u8);

impl MovedFlags {
    pub const NONE: MovedFlags = MovedFlags(0);

    const fn bit(color: Color, role: CastleRole) -> u8 {
        let shift = match role {
            CastleRole::QueensRook => 0,
            CastleRole::KingsRook => 1,
            CastleRole::King => 2,
        };
        1 << (shift + 3 * color as u8)
    }

    #[inline]
    pub const fn has(self, color: Color, role: CastleRole) -> bool {
        self.0 & Self::bit(color, role) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, role: CastleRole) {
        self.0 |= Self::bit(color, role);
    }

    /// Rook role for a back-row corner column, if it is one
    pub fn rook_role_for_col(col: u8) -> Option<CastleRole> {
        match col {
            0 => Some(CastleRole::QueensRook),
            7 => Some(CastleRole::KingsRook),
            _ => None,
        }
    }
}

/// A chess position
pub struct ChessBoard {
    grid: Grid,
    side_to_move: Color,
    moved: MovedFlags,
    /// Indexed by `Color::index`
    in_check: [bool; 2],
    en_passant_file: Option<u8>,
    legal_moves: OnceCell<MoveTable>,
    value: OnceCell<i32>,
}

impl ChessBoard {
    fn from_grid(grid: Grid) -> Self {
        let mut board = ChessBoard {
            grid,
            side_to_move: Color::White,
            moved: MovedFlags::NONE,
            in_check: [false; 2],
            en_passant_file: None,
            legal_moves: OnceCell::new(),
            value: OnceCell::new(),
        };
        board.update_checks();
        board
    }

    /// Parse the 8-line text format.
    ///
    /// Capitals are white pieces, lowercase black, space an empty square.
    /// A row cut short by a newline is padded with empty squares. Only a
    /// full last row may omit its trailing newline. The position gets white
    /// to move and full castling bookkeeping.
    pub fn parse(text: &str) -> Result<Self> {
        let mut grid: Grid = [[None; 8]; 8];
        let chars: Vec<char> = text.chars().collect();
        let mut index = 0;

        for (row, squares) in grid.iter_mut().enumerate() {
            let mut col = 0;
            while col < 8 {
                let c = *chars
                    .get(index)
                    .ok_or(FormatError::UnexpectedEnd { row, col, index })?;
                if c == '\n' {
                    break;
                }
                squares[col] = parse_square(c)?;
                index += 1;
                col += 1;
            }
            match chars.get(index) {
                None => {}
                Some('\n') => index += 1,
                Some(_) => return Err(FormatError::UnterminatedRow { row }.into()),
            }
        }

        Ok(ChessBoard::from_grid(grid))
    }

    /// The standard starting position
    pub fn new_game() -> Self {
        let mut grid: Grid = [[None; 8]; 8];
        for (row, line) in NEW_GAME.split('\n').enumerate() {
            for (col, c) in line.chars().enumerate() {
                grid[row][col] = ChessPiece::from_char(c);
            }
        }
        ChessBoard::from_grid(grid)
    }

    /// Decode a key produced by [`ChessBoard::unique_key`].
    ///
    /// Keys carry placement only: the result has white to move, no castling
    /// bits set and no en passant file.
    pub fn from_unique_key(key: &str) -> Result<Self> {
        Ok(ChessBoard::from_grid(key::decode(key)?))
    }

    /// Compact run-length key of the piece placement
    pub fn unique_key(&self) -> String {
        key::encode(&self.grid)
    }

    #[inline]
    pub fn piece_at(&self, sq: Coordinate) -> Option<ChessPiece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    fn set(&mut self, sq: Coordinate, piece: Option<ChessPiece>) {
        self.grid[sq.row() as usize][sq.col() as usize] = piece;
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn is_blacks_turn(&self) -> bool {
        self.side_to_move == Color::Black
    }

    #[inline]
    pub fn in_check(&self, color: Color) -> bool {
        self.in_check[color.index()]
    }

    #[inline]
    pub fn is_white_in_check(&self) -> bool {
        self.in_check(Color::White)
    }

    #[inline]
    pub fn is_black_in_check(&self) -> bool {
        self.in_check(Color::Black)
    }

    /// Check if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        self.in_check(self.side_to_move)
    }

    #[inline]
    pub fn has_moved(&self, color: Color, role: CastleRole) -> bool {
        self.moved.has(color, role)
    }

    #[inline]
    pub fn moved_flags(&self) -> MovedFlags {
        self.moved
    }

    /// File of a pawn that advanced two squares on the previous move
    #[inline]
    pub fn en_passant_file(&self) -> Option<u8> {
        self.en_passant_file
    }

    /// Square of `color`'s king, if it has one
    pub fn king_square(&self, color: Color) -> Option<Coordinate> {
        let king = ChessPiece::new(PieceKind::King, color);
        Coordinate::all().find(|&sq| self.piece_at(sq) == Some(king))
    }

    /// Re-derive both check flags from scratch
    fn update_checks(&mut self) {
        for color in [Color::White, Color::Black] {
            self.in_check[color.index()] = self
                .king_square(color)
                .is_some_and(|king| MoveGen::is_attacked(self, king, color.opposite()));
        }
    }

    /// Apply a move without consulting the legal move table.
    ///
    /// Only checks that the source holds a piece of the side to move. Used
    /// on working copies; published boards come from [`ChessBoard::play`].
    pub(crate) fn apply_move(&mut self, mv: &ChessMove) -> Result<()> {
        let piece = self
            .piece_at(mv.source)
            .ok_or(ChessError::EmptySource { square: mv.source })?;
        if piece.color != self.side_to_move {
            return Err(ChessError::WrongTurn {
                square: mv.source,
                side_to_move: self.side_to_move,
            });
        }
        self.apply_unchecked(mv, piece);
        Ok(())
    }

    /// Apply a move of `piece`, which must stand on the source square and
    /// belong to the side to move.
    pub(crate) fn apply_unchecked(&mut self, mv: &ChessMove, piece: ChessPiece) {
        let us = piece.color;
        let them = us.opposite();
        let (source, target) = (mv.source, mv.target);
        let mut en_passant_file = None;

        match piece.kind {
            PieceKind::Pawn => {
                if source.col() != target.col() && self.piece_at(target).is_none() {
                    // En passant: the captured pawn stands beside the source
                    if let Some(captured) = Coordinate::new(source.row(), target.col()) {
                        self.set(captured, None);
                    }
                }
                if source.row().abs_diff(target.row()) == 2 {
                    en_passant_file = Some(source.col());
                }
            }
            PieceKind::Rook => {
                if source.row() == us.back_row() {
                    if let Some(role) = MovedFlags::rook_role_for_col(source.col()) {
                        self.moved.set(us, role);
                    }
                }
            }
            PieceKind::King => {
                self.moved.set(us, CastleRole::King);
                let row = source.row();
                let rook_hop = if target.col() >= source.col() + 2 {
                    self.moved.set(us, CastleRole::KingsRook);
                    Some((7, 5))
                } else if source.col() >= target.col() + 2 {
                    self.moved.set(us, CastleRole::QueensRook);
                    Some((0, 3))
                } else {
                    None
                };
                if let Some((from_col, to_col)) = rook_hop {
                    if let (Some(from), Some(to)) =
                        (Coordinate::new(row, from_col), Coordinate::new(row, to_col))
                    {
                        let rook = self.piece_at(from);
                        self.set(to, rook);
                        self.set(from, None);
                    }
                }
            }
            _ => {}
        }

        // A rook captured on its home square can no longer castle
        if target.row() == them.back_row()
            && self.piece_at(target) == Some(ChessPiece::new(PieceKind::Rook, them))
        {
            if let Some(role) = MovedFlags::rook_role_for_col(target.col()) {
                self.moved.set(them, role);
            }
        }

        let placed = if piece.kind == PieceKind::Pawn && target.row() == us.promotion_row() {
            ChessPiece::new(mv.promotion.unwrap_or(PieceKind::Queen), us)
        } else {
            piece
        };
        self.set(target, Some(placed));
        self.set(source, None);

        self.en_passant_file = en_passant_file;
        self.side_to_move = them;
        self.update_checks();
    }

    /// The legal move table, computed on first use.
    ///
    /// Successor boards keep their own tables once expanded, so a board
    /// that was searched holds the whole explored tree until it is dropped.
    pub fn successors(&self) -> &MoveTable {
        self.legal_moves.get_or_init(|| MoveGen::generate_legal(self))
    }

    /// All legal moves, in generation order
    pub fn valid_moves(&self) -> Vec<ChessMove> {
        self.successors().iter().map(|(mv, _)| *mv).collect()
    }

    /// True if the side to move has at least one legal move.
    ///
    /// Stops at the first legal move unless the table is already built.
    pub fn has_legal_moves(&self) -> bool {
        match self.legal_moves.get() {
            Some(table) => !table.is_empty(),
            None => MoveGen::has_legal_move(self),
        }
    }

    /// Play a move given as text (e.g. "e2-e4")
    pub fn play(&self, mv: &str) -> Result<Rc<ChessBoard>> {
        let parsed = ChessMove::parse(mv)?;
        self.play_move(&parsed)
    }

    /// Play a move from the legal move table. A promoting move without a
    /// promotion kind promotes to a queen.
    pub fn play_move(&self, mv: &ChessMove) -> Result<Rc<ChessBoard>> {
        let matches = |legal: &ChessMove| match mv.promotion {
            Some(_) => legal == mv,
            None => {
                legal.source == mv.source
                    && legal.target == mv.target
                    && legal.promotion.is_none_or(|kind| kind == PieceKind::Queen)
            }
        };
        self.successors()
            .iter()
            .find(|(legal, _)| matches(legal))
            .map(|(_, board)| Rc::clone(board))
            .ok_or_else(|| ChessError::IllegalMove(mv.to_string()))
    }

    /// Static value from white's point of view, computed on first use.
    ///
    /// `+9999` when black has no legal move, `-9999` when white has none,
    /// material balance otherwise. Checkmate and stalemate score the same.
    pub fn board_value(&self) -> i32 {
        *self.value.get_or_init(|| eval::static_value(self))
    }
}

fn parse_square(c: char) -> std::result::Result<Option<ChessPiece>, FormatError> {
    if c == ' ' {
        return Ok(None);
    }
    ChessPiece::from_char(c)
        .map(Some)
        .ok_or(FormatError::UnknownPiece(c))
}

impl Clone for ChessBoard {
    /// Copies the position only; the lazy caches start out empty.
    fn clone(&self) -> Self {
        ChessBoard {
            grid: self.grid,
            side_to_move: self.side_to_move,
            moved: self.moved,
            in_check: self.in_check,
            en_passant_file: self.en_passant_file,
            legal_moves: OnceCell::new(),
            value: OnceCell::new(),
        }
    }
}

impl PartialEq for ChessBoard {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
            && self.side_to_move == other.side_to_move
            && self.moved == other.moved
            && self.in_check == other.in_check
            && self.en_passant_file == other.en_passant_file
    }
}

impl Eq for ChessBoard {}

impl Default for ChessBoard {
    fn default() -> Self {
        ChessBoard::new_game()
    }
}

impl FromStr for ChessBoard {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        ChessBoard::parse(s)
    }
}

impl fmt::Display for ChessBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for &square in row {
                write!(f, "{}", square_char(square))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChessBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChessBoard")
            .field("key", &self.unique_key())
            .field("side_to_move", &self.side_to_move)
            .field("moved", &self.moved)
            .field("in_check", &self.in_check)
            .field("en_passant_file", &self.en_passant_file)
            .finish()
    }
}
