use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    ludo::{Color, SafeZones},
};

/// Who plays a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    Human,
    #[default]
    Ai,
    None,
}

/// One participant per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Seats {
    pub red: Participant,
    pub green: Participant,
    pub yellow: Participant,
    pub blue: Participant,
}

impl Seats {
    pub fn get(&self, color: Color) -> Participant {
        match color {
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Yellow => self.yellow,
            Color::Blue => self.blue,
        }
    }

    pub fn set(&mut self, color: Color, participant: Participant) {
        let seat = match color {
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Yellow => &mut self.yellow,
            Color::Blue => &mut self.blue,
        };
        *seat = participant;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Classic,
    /// Each roll must happen within `turn_secs`; standings use accumulated score.
    Timed { turn_secs: u32 },
}

impl Mode {
    pub fn is_timed(&self) -> bool {
        matches!(self, Mode::Timed { .. })
    }

    pub fn turn_limit(&self) -> Option<Duration> {
        match self {
            Mode::Classic => None,
            Mode::Timed { turn_secs } => Some(Duration::from_secs(u64::from(*turn_secs))),
        }
    }
}

/// Settings fixed for the whole game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub turn_order: Vec<Color>,
    pub seats: Seats,
    #[serde(default)]
    pub zones: SafeZones,
    #[serde(default)]
    pub mode: Mode,
    /// Apply a human's only legal move without asking.
    #[serde(default = "default_auto_move")]
    pub auto_move: bool,
}

fn default_auto_move() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            turn_order: Color::ALL.to_vec(),
            seats: Seats::default(),
            zones: SafeZones::default(),
            mode: Mode::Classic,
            auto_move: true,
        }
    }
}

impl GameConfig {
    /// Seats exactly the given colors, in the given turn order; every other color sits out.
    pub fn with_players(players: &[(Color, Participant)]) -> Self {
        let mut seats = Seats {
            red: Participant::None,
            green: Participant::None,
            yellow: Participant::None,
            blue: Participant::None,
        };
        for &(color, participant) in players {
            seats.set(color, participant);
        }
        GameConfig {
            turn_order: players.iter().map(|&(c, _)| c).collect(),
            seats,
            ..Self::default()
        }
    }

    pub fn with_zones(mut self, zones: SafeZones) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seat(mut self, color: Color, participant: Participant) -> Self {
        self.seats.set(color, participant);
        self
    }

    pub fn participant(&self, color: Color) -> Participant {
        self.seats.get(color)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_order.is_empty() {
            return Err(ConfigError::EmptyTurnOrder);
        }
        for (i, &color) in self.turn_order.iter().enumerate() {
            if self.turn_order[..i].contains(&color) {
                return Err(ConfigError::DuplicateColor(color));
            }
            if self.participant(color) == Participant::None {
                return Err(ConfigError::Unseated(color));
            }
        }
        if let Some(&color) = Color::ALL
            .iter()
            .find(|&&c| self.participant(c) != Participant::None && !self.turn_order.contains(&c))
        {
            return Err(ConfigError::MissingFromOrder(color));
        }
        if let Mode::Timed { turn_secs: 0 } = self.mode {
            return Err(ConfigError::ZeroTimer);
        }
        Ok(())
    }
}
