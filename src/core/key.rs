//! Compact position keys
//!
//! A key lists the occupied squares in row-major order. Runs of empty
//! squares are written as a single code from [`RUN_CODES`] (code `i` skips
//! `i + 1` squares) in front of the next piece letter. A run that reaches
//! the longest encodable length is flushed with an explicit space. Trailing
//! empty squares are dropped.
//!
//! Keys describe placement only; side to move, castling and en passant are
//! not part of them.

use super::board::Grid;
use super::coordinate::Coordinate;
use super::piece::{square_char, ChessPiece};
use crate::error::FormatError;

/// Run-length codes. No piece letter appears in this alphabet.
pub const RUN_CODES: &str = "0123456789ACDEFGHIJLMOSTUVWXYZacdefghijlmostuvwxyz";

const MAX_RUN: usize = RUN_CODES.len() - 1;

pub(crate) fn encode(grid: &Grid) -> String {
    let codes = RUN_CODES.as_bytes();
    let mut key = String::new();
    let mut run = 0;

    for sq in Coordinate::all() {
        let square = grid[sq.row() as usize][sq.col() as usize];
        if run >= MAX_RUN || square.is_some() {
            if run > 0 {
                key.push(codes[run - 1] as char);
            }
            key.push(square_char(square));
            run = 0;
        } else {
            run += 1;
        }
    }
    key
}

pub(crate) fn decode(key: &str) -> Result<Grid, FormatError> {
    let mut grid: Grid = [[None; 8]; 8];
    let mut pos = 0;
    let mut chars = key.chars();

    while let Some(mut c) = chars.next() {
        if let Some(skip) = RUN_CODES.find(c) {
            pos += skip + 1;
            c = chars
                .next()
                .ok_or_else(|| FormatError::InvalidKey(format!("{key:?} ends after a run code")))?;
        }
        let sq = Coordinate::from_index(pos)
            .ok_or_else(|| FormatError::InvalidKey(format!("{key:?} runs past the last square")))?;
        grid[sq.row() as usize][sq.col() as usize] = if c == ' ' {
            None
        } else {
            Some(ChessPiece::from_char(c).ok_or(FormatError::UnknownPiece(c))?)
        };
        pos += 1;
    }
    Ok(grid)
}
