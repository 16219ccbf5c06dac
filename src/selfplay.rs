use hashbrown::HashMap;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;

use crate::{
    config::{GameConfig, Participant},
    error::GameError,
    ludo::{Color, Game, RollOutcome},
    ranking::Standing,
};

/// Rolls after which an unfinished game is abandoned.
pub const MAX_ROLLS: u32 = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub winner: Option<Color>,
    pub rolls: u32,
    pub moves: u32,
    pub captures: u32,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    pub games: u32,
    pub wins: HashMap<Color, u32>,
    pub unfinished: u32,
    pub average_moves: f32,
    pub average_captures: f32,
}

impl SimulationStats {
    pub fn win_rate(&self, color: Color) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins.get(&color).copied().unwrap_or(0) as f32 / self.games as f32 * 100.0
    }
}

/// Plays one game with every seated color driven by the AI.
pub fn play_game<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R, max_rolls: u32) -> Result<GameRecord, GameError> {
    let mut config = config.clone();
    for &color in &config.turn_order.clone() {
        config.seats.set(color, Participant::Ai);
    }
    let mut game = Game::new(config)?;
    let mut rolls = 0;
    let mut captures = 0;

    while game.winner().is_none() && rolls < max_rolls {
        rolls += 1;
        if let RollOutcome::AwaitingMove(_) = game.roll_random(rng)? {
            let report = game.play_ai(rng)?;
            captures += report.outcome.captured.len() as u32;
        }
    }

    if game.winner().is_none() {
        debug!("abandoning game after {rolls} rolls");
    }

    Ok(GameRecord {
        winner: game.winner(),
        rolls,
        moves: game.turns(),
        captures,
        standings: game.standings(),
    })
}

/// Plays `games` independent AI games in parallel. Game `i` uses seed `seed + i`,
/// so a given seed always reproduces the same statistics.
pub fn simulate(config: &GameConfig, games: u32, seed: u64) -> Result<SimulationStats, GameError> {
    config.validate()?;
    let records = (0..games)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(u64::from(i)));
            play_game(config, &mut rng, MAX_ROLLS)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut wins = HashMap::new();
    let mut unfinished = 0;
    let mut total_moves = 0u64;
    let mut total_captures = 0u64;
    for record in &records {
        match record.winner {
            Some(color) => *wins.entry(color).or_insert(0) += 1,
            None => unfinished += 1,
        }
        total_moves += u64::from(record.moves);
        total_captures += u64::from(record.captures);
    }

    let divisor = games.max(1) as f32;
    let stats = SimulationStats {
        games,
        wins,
        unfinished,
        average_moves: total_moves as f32 / divisor,
        average_captures: total_captures as f32 / divisor,
    };
    info!(
        "simulated {} games: {} unfinished, {:.1} moves and {:.1} captures per game",
        stats.games, stats.unfinished, stats.average_moves, stats.average_captures
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ludo::SafeZones;

    #[test]
    fn ai_game_reaches_a_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let record = play_game(&GameConfig::default(), &mut rng, MAX_ROLLS).unwrap();
        let winner = record.winner.expect("AI game should finish");
        assert_eq!(record.standings[0].color, winner);
        assert_eq!(record.standings[0].finished, 4);
        assert!(record.moves > 0);
    }

    #[test]
    fn human_seats_are_replaced_by_ai() {
        let config = GameConfig::with_players(&[(Color::Red, Participant::Human), (Color::Yellow, Participant::Ai)]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let record = play_game(&config, &mut rng, MAX_ROLLS).unwrap();
        assert!(record.winner.is_some());
        assert_eq!(record.standings.len(), 2);
    }

    #[test]
    fn simulation_is_reproducible() {
        let config = GameConfig::default().with_zones(SafeZones::with_secondary(true));
        let a = simulate(&config, 8, 42).unwrap();
        let b = simulate(&config, 8, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.games, 8);
        let decided: u32 = a.wins.values().sum();
        assert_eq!(decided + a.unfinished, 8);
    }

    #[test]
    fn zero_games_yield_empty_stats() {
        let stats = simulate(&GameConfig::default(), 0, 0).unwrap();
        assert_eq!(stats.games, 0);
        assert_eq!(stats.win_rate(Color::Red), 0.0);
    }
}
