//! Four-player Ludo: board geometry, move rules, a turn controller and a
//! heuristic computer opponent.

pub mod config;
pub mod engine;
pub mod error;
pub mod ludo;
pub mod misc;
pub mod ranking;
pub mod selfplay;
pub mod snapshot;
