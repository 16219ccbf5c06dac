use std::{collections::BTreeMap, fs, path::Path};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    config::GameConfig,
    error::SnapshotError,
    ludo::{Board, Color, Die, Game, Phase},
};

/// Everything needed to resume a game exactly where it stopped, including a
/// committed die that still awaits a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: GameConfig,
    pub board: Board,
    pub current: Color,
    pub last_die: Option<Die>,
    pub phase: Phase,
    pub turns: u32,
    pub scores: BTreeMap<Color, u32>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Resumes the saved game at `path`, or starts a fresh game with `fallback`
/// when the file is missing, malformed, finished or inconsistent.
pub fn resume_or_new(path: impl AsRef<Path>, fallback: GameConfig) -> Result<Game, SnapshotError> {
    let path = path.as_ref();
    match Snapshot::load(path).and_then(Game::resume) {
        Ok(game) => Ok(game),
        Err(err) => {
            warn!("not resuming {}: {err}", path.display());
            Ok(Game::new(fallback)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ludo::{Position, RollOutcome, path::square_at};

    #[test]
    fn json_names_colors_and_phase() {
        let game = Game::new(GameConfig::default()).unwrap();
        let json = game.snapshot().to_json().unwrap();
        assert!(json.contains("\"red\""));
        assert!(json.contains("\"state\": \"rolling\""));
        assert!(json.contains("\"Yard\""));
    }

    #[test]
    fn committed_die_survives_round_trip() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let RollOutcome::AwaitingMove(_) = game.roll(Die::SIX).unwrap() else {
            panic!("expected a choice");
        };
        let snapshot = game.snapshot();
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);

        let resumed = Game::resume(restored).unwrap();
        assert_eq!(resumed.phase(), Phase::Moving { die: Die::SIX });
        assert_eq!(resumed.legal_moves().len(), 4);
        assert_eq!(resumed.snapshot(), snapshot);
    }

    #[test]
    fn finished_games_are_not_resumed() {
        let mut snapshot = Game::new(GameConfig::default()).unwrap().snapshot();
        snapshot.phase = Phase::GameOver { winner: Color::Green };
        assert!(matches!(Game::resume(snapshot), Err(SnapshotError::Terminal)));
    }

    #[test]
    fn pawn_off_its_path_is_rejected() {
        let mut snapshot = Game::new(GameConfig::default()).unwrap().snapshot();
        snapshot.board.set_position(Color::Blue, 1, Position::Board(square_at(Color::Red, 53)));
        assert!(matches!(Game::resume(snapshot), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn moving_phase_without_moves_is_rejected() {
        let mut snapshot = Game::new(GameConfig::default()).unwrap().snapshot();
        let two = Die::new(2).unwrap();
        snapshot.phase = Phase::Moving { die: two };
        snapshot.last_die = Some(two);
        assert!(matches!(Game::resume(snapshot), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(Snapshot::from_json("{\"board\": 3}"), Err(SnapshotError::Json(_))));
        let json = Game::new(GameConfig::default()).unwrap().snapshot().to_json().unwrap();
        let bad_die = json.replace("\"last_die\": null", "\"last_die\": 9");
        assert!(Snapshot::from_json(&bad_die).is_err());
    }

    #[test]
    fn off_board_square_is_an_error() {
        let json = Game::new(GameConfig::default()).unwrap().snapshot().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["board"]["red"][0] = serde_json::json!({ "Board": 240 });
        let edited = serde_json::to_string(&value).unwrap();
        assert!(matches!(Snapshot::from_json(&edited), Err(SnapshotError::Json(_))));

        let path = std::env::temp_dir().join(format!("ludo-off-board-{}.json", std::process::id()));
        fs::write(&path, edited).unwrap();
        let game = resume_or_new(&path, GameConfig::default()).unwrap();
        assert_eq!(game.board(), &Board::new());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_falls_back_to_new_game() {
        let game = resume_or_new("/nonexistent/ludo-save.json", GameConfig::default()).unwrap();
        assert_eq!(game.phase(), Phase::Rolling);
        assert_eq!(game.turns(), 0);
    }
}
