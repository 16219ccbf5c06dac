use rand::Rng;

use crate::ludo::{Board, Color, Die, Move, Position, SafeZones, path};

const FINISH_REWARD: f32 = 1000.0;
const CAPTURE_REWARD: f32 = 700.0;
const PER_CAPTURED_PAWN: f32 = 100.0;
const LEAVE_YARD_REWARD: f32 = 120.0;
const SAFE_LANDING_REWARD: f32 = 40.0;
const PROGRESS_WEIGHT: f32 = 10.0;
const ENTRY_PROGRESS_WEIGHT: f32 = 5.0;
const BREAK_STACK_PENALTY: f32 = 250.0;

/// Picks a move for a computer-controlled `color`.
///
/// With no legal move on a six, a yard pawn is forced onto the board even if
/// the anti-blockade rule would forbid it, so the turn is never wasted.
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    color: Color,
    die: Die,
    zones: &SafeZones,
    rng: &mut R,
) -> Option<Move> {
    let legal_moves = board.legal_moves(color, die, zones);
    if legal_moves.is_empty() {
        return forced_entry(board, color, die);
    }
    choose_from(board, color, &legal_moves, zones, rng)
}

/// Highest scoring candidate, ties broken by a random term below one point.
pub fn choose_from<R: Rng + ?Sized>(
    board: &Board,
    color: Color,
    candidates: &[Move],
    zones: &SafeZones,
    rng: &mut R,
) -> Option<Move> {
    candidates
        .iter()
        .map(|&m| (m, score_move(board, color, m, zones) + rng.random::<f32>()))
        .max_by(|(_, eval1), (_, eval2)| eval1.total_cmp(eval2))
        .map(|(m, _)| m)
}

/// Entry move of the lowest yard pawn on a six, ignoring stacking limits.
pub fn forced_entry(board: &Board, color: Color, die: Die) -> Option<Move> {
    if !die.is_six() {
        return None;
    }
    board
        .pawns(color)
        .iter()
        .find(|p| p.position.is_yard())
        .map(|p| Move::new(p.id, Position::Yard, path::entry_square(color)))
}

/// Deterministic part of the move score. Higher is better.
pub fn score_move(board: &Board, color: Color, mv: Move, zones: &SafeZones) -> f32 {
    let mut score = 0.0;
    let to_index = mv.to_index(color).unwrap_or(0);

    if to_index == path::LAST_INDEX {
        score += FINISH_REWARD;
    }

    if !zones.is_safe(mv.to) {
        let opponents = board.opponents_on(color, mv.to);
        if opponents > 0 {
            score += CAPTURE_REWARD + PER_CAPTURED_PAWN * opponents as f32;
        }
    }

    if zones.is_safe(mv.to) {
        score += SAFE_LANDING_REWARD;
    }

    match mv.from_index(color) {
        Some(from_index) => {
            score += (to_index as f32 - from_index as f32) * PROGRESS_WEIGHT;
        }
        None => {
            score += LEAVE_YARD_REWARD;
            score += to_index as f32 * ENTRY_PROGRESS_WEIGHT;
        }
    }

    if let Some(from) = mv.from.square() {
        if zones.is_safe(from) && board.count_on(color, from) >= 2 {
            score -= BREAK_STACK_PENALTY;
        }
    }

    score
}
