use serde::{Deserialize, Serialize};

use crate::{
    error::SnapshotError,
    ludo::{
        Color, Die, Move, MoveList, MoveOutcome, PAWNS_PER_COLOR, Pawn, PawnId, Position, SafeZones,
        Square, path,
    },
    misc::TinyVec,
};

/// The complete pawn layout: four pawns for each of the four colors.
///
/// This is the only mutable game state the rules operate on. Seating, turn
/// order and phase live in [`crate::ludo::Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "BoardRecord", into = "BoardRecord")]
pub struct Board {
    pawns: [[Pawn; PAWNS_PER_COLOR]; 4],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Start of a game: every pawn in its yard.
    pub fn new() -> Self {
        Board {
            pawns: [[Pawn::in_yard(0), Pawn::in_yard(1), Pawn::in_yard(2), Pawn::in_yard(3)]; 4],
        }
    }

    /// Builder used to set up arbitrary positions.
    pub fn with_positions(mut self, color: Color, positions: [Position; PAWNS_PER_COLOR]) -> Self {
        for (pawn, position) in self.pawns[color.index()].iter_mut().zip(positions) {
            pawn.position = position;
        }
        self
    }

    pub fn set_position(&mut self, color: Color, pawn: PawnId, position: Position) {
        self.pawns[color.index()][pawn as usize].position = position;
    }

    pub fn pawns(&self, color: Color) -> &[Pawn; PAWNS_PER_COLOR] {
        &self.pawns[color.index()]
    }

    pub fn pawn(&self, color: Color, pawn: PawnId) -> &Pawn {
        &self.pawns[color.index()][pawn as usize]
    }

    pub fn positions(&self, color: Color) -> [Position; PAWNS_PER_COLOR] {
        self.pawns[color.index()].map(|p| p.position)
    }

    /// Number of `color`'s pawns standing on `square`.
    pub fn count_on(&self, color: Color, square: Square) -> usize {
        self.pawns(color)
            .iter()
            .filter(|p| p.position == Position::Board(square))
            .count()
    }

    pub fn opponents_on(&self, color: Color, square: Square) -> usize {
        color.others().map(|c| self.count_on(c, square)).sum()
    }

    pub fn occupants(&self, square: Square) -> impl Iterator<Item = (Color, PawnId)> + '_ {
        Color::ALL.into_iter().flat_map(move |c| {
            self.pawns(c)
                .iter()
                .filter(move |p| p.position == Position::Board(square))
                .map(move |p| (c, p.id))
        })
    }

    pub fn finished(&self, color: Color) -> u8 {
        self.pawns(color).iter().filter(|p| p.reached_home()).count() as u8
    }

    pub fn in_yard(&self, color: Color) -> usize {
        self.pawns(color).iter().filter(|p| p.position.is_yard()).count()
    }

    pub fn progress(&self, color: Color) -> u32 {
        self.pawns(color).iter().map(|p| p.progress(color)).sum()
    }

    pub fn has_won(&self, color: Color) -> bool {
        self.finished(color) as usize == PAWNS_PER_COLOR
    }

    /// First color, in seating order, with all four pawns home.
    pub fn winner(&self) -> Option<Color> {
        Color::ALL.into_iter().find(|&c| self.has_won(c))
    }

    /// A third own pawn may not join a stack on an unsafe square.
    fn blocked_for(&self, color: Color, square: Square, zones: &SafeZones) -> bool {
        !zones.is_safe(square) && self.count_on(color, square) >= 2
    }

    /// Every legal move for `color` with `die`, in pawn order.
    pub fn legal_moves(&self, color: Color, die: Die, zones: &SafeZones) -> MoveList {
        let mut moves = MoveList::new();
        for pawn in self.pawns(color) {
            let target = match pawn.position {
                Position::Home => continue,
                Position::Yard if die.is_six() => path::entry_square(color),
                Position::Yard => continue,
                Position::Board(square) => {
                    let Some(index) = path::path_index(color, square) else {
                        continue;
                    };
                    let next = index as usize + die.value() as usize;
                    if next >= path::PATH_LEN {
                        continue;
                    }
                    path::square_at(color, next as u8)
                }
            };
            if self.blocked_for(color, target, zones) {
                continue;
            }
            moves.push(Move::new(pawn.id, pawn.position, target));
        }
        moves
    }

    /// Applies `mv` for `color` and resolves captures, home arrival and the win.
    ///
    /// The move is not checked against [`Self::legal_moves`]; callers validate first.
    pub fn apply_move(&mut self, color: Color, mv: Move, die: Die, zones: &SafeZones) -> MoveOutcome {
        let destination = mv.to;
        self.set_position(color, mv.pawn, Position::Board(destination));

        let mut captured = TinyVec::new();
        if !zones.is_safe(destination) {
            for other in color.others() {
                if self.count_on(other, destination) != 1 {
                    continue;
                }
                let victim = self
                    .pawns(other)
                    .iter()
                    .find(|p| p.position == Position::Board(destination))
                    .map(|p| p.id);
                if let Some(id) = victim {
                    self.set_position(other, id, Position::Yard);
                    captured.push((other, id));
                }
            }
        }

        let reached_home = path::path_index(color, destination) == Some(path::LAST_INDEX);
        if reached_home {
            self.set_position(color, mv.pawn, Position::Home);
        }

        let winner = self.has_won(color).then_some(color);

        MoveOutcome {
            captured,
            reached_home,
            winner,
            extra_turn: die.is_six() || !captured.is_empty() || reached_home,
        }
    }

    /// Every on-board pawn must lie on its own color's path, short of the home square.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for color in Color::ALL {
            for pawn in self.pawns(color) {
                let Position::Board(square) = pawn.position else {
                    continue;
                };
                match path::path_index(color, square) {
                    None => {
                        return Err(SnapshotError::Inconsistent(format!(
                            "{color} pawn {} on {:?} is off its path",
                            pawn.id, square
                        )));
                    }
                    Some(path::LAST_INDEX) => {
                        return Err(SnapshotError::Inconsistent(format!(
                            "{color} pawn {} sits on the home square without being home",
                            pawn.id
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Plain-text dump of the grid for logs and the terminal driver.
    pub fn to_fancy_string(&self, zones: &SafeZones) -> String {
        let mut out = String::new();
        for y in 0..Square::GRID {
            for x in 0..Square::GRID {
                let square = Square::new(x, y);
                let mut occupants = self.occupants(square);
                let cell = match occupants.next() {
                    Some((color, _)) => {
                        let rest: Vec<_> = occupants.collect();
                        if rest.iter().all(|&(c, _)| c == color) {
                            format!("{}{}", color.letter(), rest.len() + 1)
                        } else {
                            "++".to_string()
                        }
                    }
                    None if zones.is_safe(square) => "* ".to_string(),
                    None if path::is_track(square) => ". ".to_string(),
                    None => "  ".to_string(),
                };
                out.push_str(&cell);
            }
            out.push('\n');
        }
        for color in Color::ALL {
            out.push_str(&format!(
                "{:<6} yard {} home {} progress {}\n",
                color.to_string(),
                self.in_yard(color),
                self.finished(color),
                self.progress(color)
            ));
        }
        out
    }
}

/// Serialized layout: one named list of four positions per color.
#[derive(Serialize, Deserialize)]
struct BoardRecord {
    red: [Position; PAWNS_PER_COLOR],
    green: [Position; PAWNS_PER_COLOR],
    yellow: [Position; PAWNS_PER_COLOR],
    blue: [Position; PAWNS_PER_COLOR],
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        BoardRecord {
            red: board.positions(Color::Red),
            green: board.positions(Color::Green),
            yellow: board.positions(Color::Yellow),
            blue: board.positions(Color::Blue),
        }
    }
}

impl From<BoardRecord> for Board {
    fn from(record: BoardRecord) -> Self {
        Board::new()
            .with_positions(Color::Red, record.red)
            .with_positions(Color::Green, record.green)
            .with_positions(Color::Yellow, record.yellow)
            .with_positions(Color::Blue, record.blue)
    }
}
