use hashbrown::HashMap;
use serde::Serialize;

use crate::{
    config::Mode,
    ludo::{Board, Color},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub color: Color,
    pub finished: u8,
    /// Accumulated score in timed games, finished pawns otherwise.
    pub effective_score: u32,
    /// Sum of path indices; a home pawn counts the full path length.
    pub progress: u32,
}

/// Orders the seated colors best first.
///
/// Primary key is the effective score, ties go to the larger progress sum.
/// Remaining ties keep turn order.
pub fn rank(board: &Board, turn_order: &[Color], scores: &HashMap<Color, u32>, mode: Mode) -> Vec<Standing> {
    let mut standings: Vec<Standing> = turn_order
        .iter()
        .map(|&color| {
            let finished = board.finished(color);
            let effective_score = if mode.is_timed() {
                scores.get(&color).copied().unwrap_or(0)
            } else {
                u32::from(finished)
            };
            Standing { color, finished, effective_score, progress: board.progress(color) }
        })
        .collect();

    standings.sort_by(|a, b| {
        b.effective_score
            .cmp(&a.effective_score)
            .then_with(|| b.progress.cmp(&a.progress))
    });
    standings
}
