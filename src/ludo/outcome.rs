use crate::{
    ludo::{Color, PawnId},
    misc::TinyVec,
};

/// Result of applying one move to a [`crate::ludo::Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Opposing pawns sent back to the yard, at most one per other color.
    pub captured: TinyVec<(Color, PawnId), 3>,
    pub reached_home: bool,
    pub winner: Option<Color>,
    /// Die was a six, a capture happened, or a pawn reached home.
    pub extra_turn: bool,
}

impl MoveOutcome {
    pub fn captured_any(&self) -> bool {
        !self.captured.is_empty()
    }
}
