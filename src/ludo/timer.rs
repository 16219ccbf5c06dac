use std::time::{Duration, Instant};

use crate::ludo::{Color, PhaseKind};

/// Identifies one live turn phase. Every phase change or rotation produces a
/// new epoch, so callbacks holding an old ticket can tell they are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub epoch: u64,
    pub color: Color,
    pub phase: PhaseKind,
}

/// Single-shot countdown keyed to a [`Ticket`].
#[derive(Debug, Clone, Default)]
pub struct TurnTimer {
    limit: Option<Duration>,
    armed: Option<(Ticket, Instant)>,
}

impl TurnTimer {
    pub fn new(limit: Option<Duration>) -> Self {
        TurnTimer { limit, armed: None }
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Starts the countdown for `ticket`, replacing any previous one.
    /// Returns the deadline, or `None` when no limit is configured.
    pub fn arm(&mut self, ticket: Ticket, now: Instant) -> Option<Instant> {
        let deadline = now + self.limit?;
        self.armed = Some((ticket, deadline));
        Some(deadline)
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn deadline(&self) -> Option<(Ticket, Instant)> {
        self.armed
    }

    /// The armed ticket once its deadline has passed.
    pub fn due(&self, now: Instant) -> Option<Ticket> {
        self.armed
            .filter(|&(_, deadline)| now >= deadline)
            .map(|(ticket, _)| ticket)
    }
}
