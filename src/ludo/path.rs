//! Static board geometry: the shared ring, each color's home stretch and the
//! 57-square path every pawn follows from its entry square to home.
//!
//! All tables are computed at compile time, so every process sees exactly the
//! same paths.

use serde::{Deserialize, Serialize};

use crate::ludo::{Color, Square};

/// Number of squares in a color's path (ring part plus home stretch).
pub const PATH_LEN: usize = 57;
/// Path index of the terminal home square.
pub const LAST_INDEX: u8 = (PATH_LEN - 1) as u8;
/// Ring squares a pawn visits before turning into its home stretch.
pub const RING_STEPS: usize = 51;
pub const HOME_STRETCH: usize = 6;

const RING_LEN: usize = 52;
const NOT_ON_PATH: u8 = u8::MAX;
const SECONDARY_OFFSET: usize = 8;

// Clockwise, starting at red's entry square.
const RING: [Square; RING_LEN] = [
    Square::new(1, 6), Square::new(2, 6), Square::new(3, 6), Square::new(4, 6), Square::new(5, 6),
    Square::new(6, 5), Square::new(6, 4), Square::new(6, 3), Square::new(6, 2), Square::new(6, 1), Square::new(6, 0),
    Square::new(7, 0),
    Square::new(8, 0), Square::new(8, 1), Square::new(8, 2), Square::new(8, 3), Square::new(8, 4), Square::new(8, 5),
    Square::new(9, 6), Square::new(10, 6), Square::new(11, 6), Square::new(12, 6), Square::new(13, 6), Square::new(14, 6),
    Square::new(14, 7),
    Square::new(14, 8), Square::new(13, 8), Square::new(12, 8), Square::new(11, 8), Square::new(10, 8), Square::new(9, 8),
    Square::new(8, 9), Square::new(8, 10), Square::new(8, 11), Square::new(8, 12), Square::new(8, 13), Square::new(8, 14),
    Square::new(7, 14),
    Square::new(6, 14), Square::new(6, 13), Square::new(6, 12), Square::new(6, 11), Square::new(6, 10), Square::new(6, 9),
    Square::new(5, 8), Square::new(4, 8), Square::new(3, 8), Square::new(2, 8), Square::new(1, 8), Square::new(0, 8),
    Square::new(0, 7),
    Square::new(0, 6),
];

const ENTRY_OFFSET: [usize; 4] = [0, 13, 26, 39];

const HOME_STRETCHES: [[Square; HOME_STRETCH]; 4] = [
    [Square::new(1, 7), Square::new(2, 7), Square::new(3, 7), Square::new(4, 7), Square::new(5, 7), Square::new(6, 7)],
    [Square::new(7, 1), Square::new(7, 2), Square::new(7, 3), Square::new(7, 4), Square::new(7, 5), Square::new(7, 6)],
    [Square::new(13, 7), Square::new(12, 7), Square::new(11, 7), Square::new(10, 7), Square::new(9, 7), Square::new(8, 7)],
    [Square::new(7, 13), Square::new(7, 12), Square::new(7, 11), Square::new(7, 10), Square::new(7, 9), Square::new(7, 8)],
];

const PATHS: [[Square; PATH_LEN]; 4] = build_paths();
const PATH_INDEX: [[u8; Square::COUNT]; 4] = build_path_index();

const fn build_paths() -> [[Square; PATH_LEN]; 4] {
    let mut paths = [[Square::new(0, 0); PATH_LEN]; 4];
    let mut c = 0;
    while c < 4 {
        let mut i = 0;
        while i < RING_STEPS {
            paths[c][i] = RING[(ENTRY_OFFSET[c] + i) % RING_LEN];
            i += 1;
        }
        let mut j = 0;
        while j < HOME_STRETCH {
            paths[c][RING_STEPS + j] = HOME_STRETCHES[c][j];
            j += 1;
        }
        c += 1;
    }
    paths
}

const fn build_path_index() -> [[u8; Square::COUNT]; 4] {
    let mut index = [[NOT_ON_PATH; Square::COUNT]; 4];
    let mut c = 0;
    while c < 4 {
        let mut i = 0;
        while i < PATH_LEN {
            index[c][PATHS[c][i].index() as usize] = i as u8;
            i += 1;
        }
        c += 1;
    }
    index
}

pub fn path_of(color: Color) -> &'static [Square; PATH_LEN] {
    &PATHS[color.index()]
}

pub fn entry_square(color: Color) -> Square {
    PATHS[color.index()][0]
}

pub fn secondary_safe_square(color: Color) -> Square {
    PATHS[color.index()][SECONDARY_OFFSET]
}

pub fn home_square(color: Color) -> Square {
    PATHS[color.index()][LAST_INDEX as usize]
}

/// Square at `index` of the color's path. `index` must be below [`PATH_LEN`].
pub fn square_at(color: Color, index: u8) -> Square {
    PATHS[color.index()][index as usize]
}

/// Index of `square` within the color's own path, if it lies on it.
pub fn path_index(color: Color, square: Square) -> Option<u8> {
    match PATH_INDEX[color.index()][square.index() as usize] {
        NOT_ON_PATH => None,
        i => Some(i),
    }
}

/// True for squares any pawn can ever stand on.
pub fn is_track(square: Square) -> bool {
    Color::ALL.iter().any(|&c| path_index(c, square).is_some())
}

/// Which squares protect pawns from capture. Fixed for a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZones {
    /// Entry squares are safe. Turning this off is the "open starts" house rule.
    pub entries: bool,
    /// The four star squares eight steps past each entry are safe.
    pub secondary: bool,
}

impl Default for SafeZones {
    fn default() -> Self {
        SafeZones { entries: true, secondary: false }
    }
}

impl SafeZones {
    pub fn with_secondary(secondary: bool) -> Self {
        SafeZones { secondary, ..Self::default() }
    }

    pub fn is_safe(&self, square: Square) -> bool {
        Color::ALL.iter().any(|&c| {
            (self.entries && entry_square(c) == square)
                || (self.secondary && secondary_safe_square(c) == square)
        })
    }

    pub fn safe_squares(&self) -> Vec<Square> {
        let mut squares = Vec::with_capacity(8);
        for color in Color::ALL {
            if self.entries {
                squares.push(entry_square(color));
            }
            if self.secondary {
                squares.push(secondary_safe_square(color));
            }
        }
        squares
    }
}
