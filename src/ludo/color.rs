use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    /// Clockwise seating order around the board.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn others(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |&c| c != self)
    }

    /// The color after `self` in `order`, wrapping around.
    /// Falls back to the first color of `order` if `self` is not seated.
    pub fn next_in(self, order: &[Color]) -> Color {
        match order.iter().position(|&c| c == self) {
            Some(i) => order[(i + 1) % order.len()],
            None => order[0],
        }
    }

    pub fn letter(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Blue => 'B',
        }
    }

    pub fn parse(name: &str) -> Option<Color> {
        match name.to_ascii_lowercase().as_str() {
            "red" | "r" => Some(Color::Red),
            "green" | "g" => Some(Color::Green),
            "yellow" | "y" => Some(Color::Yellow),
            "blue" | "b" => Some(Color::Blue),
            _ => None,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        };
        f.write_str(name)
    }
}
