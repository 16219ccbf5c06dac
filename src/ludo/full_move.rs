use std::fmt::Debug;

use crate::{
    ludo::{Color, PawnId, Position, Square, path},
    misc::TinyVec,
};

/// One pawn moving to one destination square.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub pawn: PawnId,
    pub from: Position,
    pub to: Square,
}

/// At most one candidate per pawn.
pub type MoveList = TinyVec<Move, 4>;

impl Move {
    pub fn new(pawn: PawnId, from: Position, to: Square) -> Self {
        Move { pawn, from, to }
    }

    pub fn leaves_yard(&self) -> bool {
        self.from.is_yard()
    }

    pub fn from_index(&self, color: Color) -> Option<u8> {
        self.from.square().and_then(|sq| path::path_index(color, sq))
    }

    pub fn to_index(&self, color: Color) -> Option<u8> {
        path::path_index(color, self.to)
    }

    pub fn finishes(&self, color: Color) -> bool {
        self.to_index(color) == Some(path::LAST_INDEX)
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pawn {}: {:?} -> {:?}", self.pawn, self.from, self.to)
    }
}
