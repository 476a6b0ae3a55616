//! Move representation
//!
//! A move is a source and target square plus an optional promotion kind.
//! Its canonical text is `"<source>-<target>"` followed by the uppercase
//! promotion letter when there is one, e.g. `"e2-e4"` or `"e7-e8Q"`.

use std::fmt;
use std::str::FromStr;

use super::coordinate::Coordinate;
use super::piece::PieceKind;
use crate::error::FormatError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChessMove {
    pub source: Coordinate,
    pub target: Coordinate,
    pub promotion: Option<PieceKind>,
}

impl ChessMove {
    #[inline]
    pub const fn new(source: Coordinate, target: Coordinate) -> Self {
        ChessMove {
            source,
            target,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(source: Coordinate, target: Coordinate, kind: PieceKind) -> Self {
        ChessMove {
            source,
            target,
            promotion: Some(kind),
        }
    }

    /// Parse from move text (e.g. "e2-e4", "e7-e8Q"). The promotion letter
    /// may be either case.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidMove(s.to_string());
        if !s.is_ascii() || !(5..=6).contains(&s.len()) || s.as_bytes()[2] != b'-' {
            return Err(invalid());
        }

        let source = Coordinate::from_algebraic(&s[0..2]).ok_or_else(invalid)?;
        let target = Coordinate::from_algebraic(&s[3..5]).ok_or_else(invalid)?;

        match s[5..].chars().next() {
            None => Ok(ChessMove::new(source, target)),
            Some(c) => match PieceKind::from_char(c) {
                Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => {
                    Ok(ChessMove::with_promotion(source, target, kind))
                }
                _ => Err(invalid()),
            },
        }
    }
}

impl FromStr for ChessMove {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChessMove::parse(s)
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}
