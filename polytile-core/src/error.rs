//! Errors for parsing move text.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveTextError {
    /// More points than the largest piece has.
    TooManyPoints(usize),
    /// A point label the geometry cannot parse.
    InvalidPoint(String),
    /// Valid points that do not form a placement of any piece.
    NoSuchMove(String),
}

impl fmt::Display for MoveTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveTextError::TooManyPoints(n) => {
                write!(f, "illegal move (too many points: {})", n)
            }
            MoveTextError::InvalidPoint(s) => write!(f, "illegal move (invalid point '{}')", s),
            MoveTextError::NoSuchMove(s) => write!(f, "illegal move '{}'", s),
        }
    }
}

impl std::error::Error for MoveTextError {}
