mod color;
pub use color::Color;

mod square;
pub use square::Square;

mod position;
pub use position::Position;

pub mod path;
pub use path::SafeZones;

mod pawn;
pub use pawn::{PAWNS_PER_COLOR, Pawn, PawnId};

mod dice;
pub use dice::Die;

mod full_move;
pub use full_move::{Move, MoveList};

mod outcome;
pub use outcome::MoveOutcome;

mod board;
pub use board::Board;

mod timer;
pub use timer::{Ticket, TurnTimer};

mod game;
pub use game::{Game, MoveReport, Phase, PhaseKind, RollOutcome};
