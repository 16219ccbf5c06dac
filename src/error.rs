use thiserror::Error;

use crate::ludo::{Color, PawnId, PhaseKind};

/// Rejected game actions. None of these end the game; the caller re-prompts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("pawn {pawn} of {color} has no legal move")]
    InvalidMoveSelection { color: Color, pawn: PawnId },
    #[error("it is {current}'s turn, not {color}'s")]
    NotYourTurn { color: Color, current: Color },
    #[error("expected the {expected} phase, game is {found}")]
    WrongPhase { expected: PhaseKind, found: PhaseKind },
    #[error("the game is over")]
    GameOver,
    #[error("die value {0} is outside 1..=6")]
    DieOutOfRange(u8),
    #[error("{0} is not played by the computer")]
    NotAiSeat(Color),
    #[error("no move available for {0}")]
    NoMoveAvailable(Color),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("turn order is empty")]
    EmptyTurnOrder,
    #[error("{0} appears twice in the turn order")]
    DuplicateColor(Color),
    #[error("{0} is in the turn order but has no participant")]
    Unseated(Color),
    #[error("{0} has a participant but is missing from the turn order")]
    MissingFromOrder(Color),
    #[error("turn timer must be at least one second")]
    ZeroTimer,
}

/// A saved game that cannot be resumed. Callers fall back to a fresh game.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is of a finished game")]
    Terminal,
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
