use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::ludo::Square;

/// Where a pawn currently is.
///
/// `Home` pawns conceptually rest on the last square of their path but are
/// off the playing surface: they never block, stack or get captured.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Yard,
    Board(Square),
    Home,
}

impl Position {
    pub fn square(&self) -> Option<Square> {
        match self {
            Position::Board(square) => Some(*square),
            _ => None,
        }
    }

    pub fn is_yard(&self) -> bool {
        matches!(self, Position::Yard)
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Position::Home)
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Yard => write!(f, "Yard"),
            Position::Home => write!(f, "Home"),
            Position::Board(square) => write!(f, "Board{:?}", square),
        }
    }
}
