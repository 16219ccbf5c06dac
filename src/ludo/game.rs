use std::{collections::BTreeMap, fmt::Display, time::Instant};

use hashbrown::HashMap;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::{GameConfig, Participant},
    engine,
    error::{ConfigError, GameError, SnapshotError},
    ludo::{Board, Color, Die, Move, MoveList, MoveOutcome, Ticket, TurnTimer},
    ranking::{self, Standing},
    snapshot::Snapshot,
};

const CAPTURE_POINTS: u32 = 20;
const HOME_POINTS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the current player's die.
    Rolling,
    /// A die is committed and the current player must pick a pawn.
    Moving { die: Die },
    GameOver { winner: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Rolling,
    Moving,
    GameOver,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Rolling => PhaseKind::Rolling,
            Phase::Moving { .. } => PhaseKind::Moving,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }
}

impl Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseKind::Rolling => write!(f, "rolling"),
            PhaseKind::Moving => write!(f, "moving"),
            PhaseKind::GameOver => write!(f, "game over"),
        }
    }
}

/// What happened after a die was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollOutcome {
    /// Nothing can move. With a six the same player rolls again.
    NoMove { reroll: bool },
    /// The current player has to choose among these moves.
    AwaitingMove(MoveList),
    /// A human's only move was applied automatically.
    Moved(MoveReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub color: Color,
    pub mv: Move,
    pub die: Die,
    pub outcome: MoveOutcome,
    /// Whose turn it is after the move.
    pub next: Color,
}

/// Turn controller: sequences rolls and moves across the seated colors.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    current: Color,
    phase: Phase,
    last_die: Option<Die>,
    moves: MoveList,
    scores: HashMap<Color, u32>,
    turns: u32,
    epoch: u64,
    timer: TurnTimer,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let current = config.turn_order[0];
        let scores = config.turn_order.iter().map(|&c| (c, 0)).collect();
        let timer = TurnTimer::new(config.mode.turn_limit());
        Ok(Game {
            config,
            board: Board::new(),
            current,
            phase: Phase::Rolling,
            last_die: None,
            moves: MoveList::new(),
            scores,
            turns: 0,
            epoch: 0,
            timer,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Color {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_die(&self) -> Option<Die> {
        self.last_die
    }

    /// Moves open to the current player while in [`Phase::Moving`].
    pub fn legal_moves(&self) -> &MoveList {
        &self.moves
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn score(&self, color: Color) -> u32 {
        self.scores.get(&color).copied().unwrap_or(0)
    }

    pub fn winner(&self) -> Option<Color> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn participant(&self, color: Color) -> Participant {
        self.config.participant(color)
    }

    pub fn standings(&self) -> Vec<Standing> {
        ranking::rank(&self.board, &self.config.turn_order, &self.scores, self.config.mode)
    }

    /// Commits the current player's die.
    pub fn roll(&mut self, die: Die) -> Result<RollOutcome, GameError> {
        self.expect_phase(PhaseKind::Rolling)?;
        let color = self.current;
        self.last_die = Some(die);

        let moves = self.candidates(color, die);
        debug!("{color} rolled {} with {} legal moves", die.value(), moves.len());

        if moves.is_empty() {
            if die.is_six() {
                self.set_phase(Phase::Rolling);
                return Ok(RollOutcome::NoMove { reroll: true });
            }
            self.advance();
            return Ok(RollOutcome::NoMove { reroll: false });
        }

        if moves.len() == 1 && self.config.auto_move && self.participant(color) == Participant::Human {
            return Ok(RollOutcome::Moved(self.execute(moves[0], die)));
        }

        self.moves = moves;
        self.set_phase(Phase::Moving { die });
        Ok(RollOutcome::AwaitingMove(moves))
    }

    pub fn roll_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RollOutcome, GameError> {
        self.roll(Die::roll(rng))
    }

    /// Moves `pawn` of `color` with the committed die.
    pub fn select(&mut self, color: Color, pawn: u8) -> Result<MoveReport, GameError> {
        let die = self.committed_die()?;
        if color != self.current {
            return Err(GameError::NotYourTurn { color, current: self.current });
        }
        let mv = self
            .moves
            .iter()
            .find(|m| m.pawn == pawn)
            .copied()
            .ok_or(GameError::InvalidMoveSelection { color, pawn })?;
        Ok(self.execute(mv, die))
    }

    /// Lets the AI policy pick and apply the current player's move.
    pub fn play_ai<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MoveReport, GameError> {
        let die = self.committed_die()?;
        let color = self.current;
        if self.participant(color) != Participant::Ai {
            return Err(GameError::NotAiSeat(color));
        }
        let mv = engine::choose_from(&self.board, color, &self.moves, &self.config.zones, rng)
            .ok_or(GameError::NoMoveAvailable(color))?;
        Ok(self.execute(mv, die))
    }

    /// The ticket of the live phase, for scheduling delayed callbacks.
    pub fn ticket(&self) -> Ticket {
        Ticket { epoch: self.epoch, color: self.current, phase: self.phase.kind() }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.ticket()
    }

    /// Arms the turn timer for the current roll. Only timed games in the
    /// rolling phase get a deadline.
    pub fn start_turn_clock(&mut self, now: Instant) -> Option<Instant> {
        if self.phase != Phase::Rolling {
            return None;
        }
        let ticket = self.ticket();
        self.timer.arm(ticket, now)
    }

    pub fn turn_deadline(&self) -> Option<Instant> {
        self.timer.deadline().map(|(_, deadline)| deadline)
    }

    /// Fires the turn timer if it is due. Returns true when the turn was skipped.
    pub fn poll_turn_clock(&mut self, now: Instant) -> bool {
        match self.timer.due(now) {
            Some(ticket) => self.expire_turn(ticket),
            None => false,
        }
    }

    /// Skips the current player's turn if `ticket` still names a live roll.
    /// Stale tickets are ignored.
    pub fn expire_turn(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) || ticket.phase != PhaseKind::Rolling {
            debug!("ignoring stale turn timeout {ticket:?}");
            return false;
        }
        info!("{} ran out of time", self.current);
        self.advance();
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config.clone(),
            board: self.board,
            current: self.current,
            last_die: self.last_die,
            phase: self.phase,
            turns: self.turns,
            scores: self.scores.iter().map(|(&c, &s)| (c, s)).collect::<BTreeMap<_, _>>(),
        }
    }

    /// Rebuilds a game from a snapshot. Finished or inconsistent snapshots are rejected whole.
    pub fn resume(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        let Snapshot { config, board, current, last_die, phase, turns, scores } = snapshot;
        if matches!(phase, Phase::GameOver { .. }) || board.winner().is_some() {
            return Err(SnapshotError::Terminal);
        }
        config.validate()?;
        board.validate()?;
        if !config.turn_order.contains(&current) {
            return Err(SnapshotError::Inconsistent(format!("{current} is not in the turn order")));
        }
        if let Some(color) = scores.keys().find(|c| !config.turn_order.contains(c)) {
            return Err(SnapshotError::Inconsistent(format!("score recorded for unseated {color}")));
        }

        let mut game = Game::new(config)?;
        game.board = board;
        game.current = current;
        game.last_die = last_die;
        game.turns = turns;
        game.scores = scores.into_iter().collect();
        game.phase = phase;

        if let Phase::Moving { die } = phase {
            if last_die != Some(die) {
                return Err(SnapshotError::Inconsistent("committed die differs from last die".to_string()));
            }
            game.moves = game.candidates(current, die);
            if game.moves.is_empty() {
                return Err(SnapshotError::Inconsistent(format!("{current} has no move for {}", die.value())));
            }
        }
        Ok(game)
    }

    /// Legal moves, plus the computer's forced entry on a six when nothing else is possible.
    fn candidates(&self, color: Color, die: Die) -> MoveList {
        let moves = self.board.legal_moves(color, die, &self.config.zones);
        self.with_forced_entry(color, die, moves)
    }

    /// Only computer seats fall back to a forced entry, and only when `moves` is empty.
    fn with_forced_entry(&self, color: Color, die: Die, mut moves: MoveList) -> MoveList {
        if moves.is_empty() && self.participant(color) == Participant::Ai {
            if let Some(forced) = engine::forced_entry(&self.board, color, die) {
                debug!("{color} forces a pawn out of the yard");
                moves.push(forced);
            }
        }
        moves
    }

    fn execute(&mut self, mv: Move, die: Die) -> MoveReport {
        let color = self.current;
        let from_index = mv.from_index(color);
        let outcome = self.board.apply_move(color, mv, die, &self.config.zones);
        self.turns += 1;

        for &(victim, pawn) in outcome.captured.iter() {
            info!("{color} captured {victim} pawn {pawn}");
        }

        if self.config.mode.is_timed() {
            let steps = match (from_index, mv.to_index(color)) {
                (Some(from), Some(to)) => u32::from(to - from),
                _ => 1,
            };
            let bonus = CAPTURE_POINTS * outcome.captured.len() as u32
                + if outcome.reached_home { HOME_POINTS } else { 0 };
            *self.scores.entry(color).or_insert(0) += steps + bonus;
        }

        self.moves.clear();
        if let Some(winner) = outcome.winner {
            info!("{winner} wins after {} moves", self.turns);
            self.set_phase(Phase::GameOver { winner });
        } else if outcome.extra_turn {
            self.set_phase(Phase::Rolling);
        } else {
            self.advance();
        }

        MoveReport { color, mv, die, outcome, next: self.current }
    }

    fn advance(&mut self) {
        self.current = self.current.next_in(&self.config.turn_order);
        self.set_phase(Phase::Rolling);
    }

    /// Every transition invalidates outstanding tickets and the armed timer.
    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.epoch += 1;
        self.timer.cancel();
        debug!("{} to {} (epoch {})", self.current, phase.kind(), self.epoch);
    }

    fn expect_phase(&self, expected: PhaseKind) -> Result<(), GameError> {
        match self.phase.kind() {
            PhaseKind::GameOver => Err(GameError::GameOver),
            found if found != expected => Err(GameError::WrongPhase { expected, found }),
            _ => Ok(()),
        }
    }

    fn committed_die(&self) -> Result<Die, GameError> {
        self.expect_phase(PhaseKind::Moving)?;
        match self.phase {
            Phase::Moving { die } => Ok(die),
            other => Err(GameError::WrongPhase { expected: PhaseKind::Moving, found: other.kind() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Mode,
        ludo::{Position, SafeZones, path::square_at},
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    const Y: Position = Position::Yard;

    fn die(v: u8) -> Die {
        Die::new(v).unwrap()
    }

    fn humans() -> GameConfig {
        GameConfig::with_players(&[
            (Color::Red, Participant::Human),
            (Color::Green, Participant::Human),
        ])
    }

    #[test]
    fn non_six_without_moves_passes_turn() {
        let mut game = Game::new(humans()).unwrap();
        assert_eq!(game.roll(die(3)), Ok(RollOutcome::NoMove { reroll: false }));
        assert_eq!(game.current(), Color::Green);
        assert_eq!(game.phase(), Phase::Rolling);
        assert_eq!(game.last_die(), Some(die(3)));
    }

    #[test]
    fn six_without_moves_rolls_again() {
        let mut game = Game::new(humans()).unwrap();
        game.board = Board::new().with_positions(
            Color::Red,
            [Position::Home, Position::Home, Position::Home, Position::Board(square_at(Color::Red, 52))],
        );
        let before = game.ticket();
        assert_eq!(game.roll(Die::SIX), Ok(RollOutcome::NoMove { reroll: true }));
        assert_eq!(game.current(), Color::Red);
        assert_eq!(game.phase(), Phase::Rolling);
        assert_eq!(game.last_die(), Some(Die::SIX));
        assert!(!game.is_current(before));
        assert_eq!(game.ticket().epoch, before.epoch + 1);
    }

    #[test]
    fn forced_entry_is_offered_to_ai_seats_only() {
        let zones = SafeZones { entries: false, secondary: false };
        let config = GameConfig::with_players(&[(Color::Red, Participant::Ai), (Color::Green, Participant::Human)])
            .with_zones(zones);
        let mut game = Game::new(config).unwrap();
        let stacked = [Position::Board(square_at(Color::Red, 0)), Position::Board(square_at(Color::Red, 0)), Y, Y];
        game.board = Board::new().with_positions(Color::Red, stacked);
        assert!(game.board.legal_moves(Color::Red, Die::SIX, &zones).iter().all(|m| !m.leaves_yard()));

        let forced = Move::new(2, Y, square_at(Color::Red, 0));
        let offered = game.with_forced_entry(Color::Red, Die::SIX, MoveList::new());
        assert_eq!(&offered[..], &[forced]);
        assert!(game.with_forced_entry(Color::Red, die(5), MoveList::new()).is_empty());
        assert!(game.with_forced_entry(Color::Green, Die::SIX, MoveList::new()).is_empty());

        let legal = game.board.legal_moves(Color::Red, Die::SIX, &zones);
        assert_eq!(game.with_forced_entry(Color::Red, Die::SIX, legal), legal);
    }

    #[test]
    fn six_enters_and_grants_extra_turn() {
        let mut game = Game::new(humans()).unwrap();
        let RollOutcome::AwaitingMove(moves) = game.roll(Die::SIX).unwrap() else {
            panic!("expected a choice of four yard pawns");
        };
        assert_eq!(moves.len(), 4);
        assert_eq!(game.phase(), Phase::Moving { die: Die::SIX });

        let report = game.select(Color::Red, 2).unwrap();
        assert!(report.outcome.extra_turn);
        assert_eq!(report.next, Color::Red);
        assert_eq!(game.phase(), Phase::Rolling);
        assert_eq!(game.board().pawn(Color::Red, 2).position, Position::Board(square_at(Color::Red, 0)));
    }

    #[test]
    fn single_human_move_is_applied_automatically() {
        let mut game = Game::new(humans()).unwrap();
        game.board = Board::new().with_positions(Color::Red, [Position::Board(square_at(Color::Red, 4)), Y, Y, Y]);
        let RollOutcome::Moved(report) = game.roll(die(2)).unwrap() else {
            panic!("expected automatic move");
        };
        assert_eq!(report.mv.pawn, 0);
        assert_eq!(game.current(), Color::Green);
    }

    #[test]
    fn invalid_selection_keeps_player_and_phase() {
        let mut game = Game::new(humans()).unwrap();
        game.roll(Die::SIX).unwrap();
        let before = game.ticket();
        assert_eq!(
            game.select(Color::Green, 0),
            Err(GameError::NotYourTurn { color: Color::Green, current: Color::Red })
        );
        game.board.set_position(Color::Red, 3, Position::Home);
        game.moves.retain(|m| m.pawn != 3);
        assert_eq!(
            game.select(Color::Red, 3),
            Err(GameError::InvalidMoveSelection { color: Color::Red, pawn: 3 })
        );
        assert!(game.is_current(before));
        assert_eq!(game.roll(die(1)), Err(GameError::WrongPhase { expected: PhaseKind::Rolling, found: PhaseKind::Moving }));
    }

    #[test]
    fn winning_move_ends_the_game() {
        let mut game = Game::new(humans()).unwrap();
        game.board = Board::new().with_positions(
            Color::Red,
            [Position::Home, Position::Home, Position::Home, Position::Board(square_at(Color::Red, 51))],
        );
        let RollOutcome::Moved(report) = game.roll(die(5)).unwrap() else {
            panic!("expected automatic finishing move");
        };
        assert_eq!(report.outcome.winner, Some(Color::Red));
        assert_eq!(game.winner(), Some(Color::Red));
        assert_eq!(game.roll(die(2)), Err(GameError::GameOver));
        assert_eq!(game.select(Color::Red, 0), Err(GameError::GameOver));
    }

    #[test]
    fn ai_seat_moves_through_policy() {
        let config = GameConfig::with_players(&[(Color::Red, Participant::Ai), (Color::Blue, Participant::Ai)]);
        let mut game = Game::new(config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let RollOutcome::AwaitingMove(moves) = game.roll(Die::SIX).unwrap() else {
            panic!("expected yard entries");
        };
        assert_eq!(moves.len(), 4);
        let ticket = game.ticket();
        let report = game.play_ai(&mut rng).unwrap();
        assert!(report.mv.leaves_yard());
        assert_eq!(report.next, Color::Red);
        assert!(!game.is_current(ticket));
        assert_eq!(game.select(Color::Red, 0), Err(GameError::WrongPhase { expected: PhaseKind::Moving, found: PhaseKind::Rolling }));
    }

    #[test]
    fn play_ai_rejects_human_seat() {
        let mut game = Game::new(humans()).unwrap();
        game.roll(Die::SIX).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(game.play_ai(&mut rng), Err(GameError::NotAiSeat(Color::Red)));
    }

    #[test]
    fn turn_timer_skips_idle_player() {
        let config = humans().with_mode(Mode::Timed { turn_secs: 5 });
        let mut game = Game::new(config).unwrap();
        let start = Instant::now();
        let deadline = game.start_turn_clock(start).unwrap();
        assert_eq!(deadline, start + Duration::from_secs(5));
        assert!(!game.poll_turn_clock(start + Duration::from_secs(4)));
        assert!(game.poll_turn_clock(start + Duration::from_secs(5)));
        assert_eq!(game.current(), Color::Green);
        assert_eq!(game.turn_deadline(), None);
    }

    #[test]
    fn stale_timeout_is_ignored() {
        let config = humans().with_mode(Mode::Timed { turn_secs: 5 });
        let mut game = Game::new(config).unwrap();
        game.start_turn_clock(Instant::now());
        let stale = game.ticket();
        game.roll(die(2)).unwrap();
        assert_eq!(game.turn_deadline(), None);
        assert!(!game.expire_turn(stale));
        assert_eq!(game.current(), Color::Green);
    }

    #[test]
    fn classic_games_have_no_clock() {
        let mut game = Game::new(humans()).unwrap();
        assert_eq!(game.start_turn_clock(Instant::now()), None);
    }

    #[test]
    fn timed_games_accumulate_score() {
        let config = humans().with_mode(Mode::Timed { turn_secs: 30 });
        let mut game = Game::new(config).unwrap();
        game.board = Board::new()
            .with_positions(Color::Red, [Position::Board(square_at(Color::Red, 10)), Y, Y, Y])
            .with_positions(Color::Green, [Position::Board(square_at(Color::Red, 14)), Y, Y, Y]);
        game.roll(die(4)).unwrap();
        assert_eq!(game.score(Color::Red), 4 + CAPTURE_POINTS);
        assert_eq!(game.standings()[0].color, Color::Red);
    }
}
