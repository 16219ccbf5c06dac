use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// A cell of the 15x15 board grid, stored as `y * 15 + x`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Square(u8);

impl Square {
    pub const GRID: u8 = 15;
    pub const COUNT: usize = (Self::GRID as usize) * (Self::GRID as usize);

    pub const fn new(x: u8, y: u8) -> Self {
        Square(y * Self::GRID + x)
    }

    /// Returns `None` for indices outside the grid.
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Square(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn x(self) -> u8 {
        self.0 % Self::GRID
    }

    pub const fn y(self) -> u8 {
        self.0 / Self::GRID
    }
}

impl TryFrom<u8> for Square {
    type Error = SnapshotError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Square::from_index(index)
            .ok_or_else(|| SnapshotError::Inconsistent(format!("square {index} is off the board")))
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x(), self.y())
    }
}
