use crate::ludo::{Color, Position, path};

/// Pawn identity within its color, in `0..4`.
pub type PawnId = u8;

pub const PAWNS_PER_COLOR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pawn {
    pub id: PawnId,
    pub position: Position,
}

impl Pawn {
    pub const fn in_yard(id: PawnId) -> Self {
        Pawn { id, position: Position::Yard }
    }

    pub fn reached_home(&self) -> bool {
        self.position.is_home()
    }

    /// Path index of the pawn for `color`: `None` in the yard, the last index once home.
    pub fn path_index(&self, color: Color) -> Option<u8> {
        match self.position {
            Position::Yard => None,
            Position::Home => Some(path::LAST_INDEX),
            Position::Board(square) => path::path_index(color, square),
        }
    }

    /// Progress credit used by ranking: full path length once home.
    pub fn progress(&self, color: Color) -> u32 {
        match self.position {
            Position::Yard => 0,
            Position::Home => path::PATH_LEN as u32,
            Position::Board(square) => path::path_index(color, square).map_or(0, u32::from),
        }
    }
}
