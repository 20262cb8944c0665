//! Frame-clock timers.
//!
//! The orchestrator owns one [`TimerSet`] and advances it from the host's
//! per-frame hook. At most one timer per [`TimerKind`] is live: scheduling a
//! kind replaces its previous deadline.

use std::fmt;
use std::time::Duration;

/// Timers used by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Remove scan guidance from display once its fade finished.
    ScanFade,
    /// Start playback once the marker has been held steady.
    SettleStart,
}

impl TimerKind {
    const ALL: [TimerKind; 2] = [TimerKind::ScanFade, TimerKind::SettleStart];

    fn slot(self) -> usize {
        match self {
            TimerKind::ScanFade => 0,
            TimerKind::SettleStart => 1,
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::ScanFade => write!(f, "scan-fade"),
            TimerKind::SettleStart => write!(f, "settle-start"),
        }
    }
}

/// Deadlines on a monotonic frame clock.
#[derive(Debug, Default, Clone)]
pub struct TimerSet {
    now: Duration,
    deadlines: [Option<Duration>; 2],
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arm `kind` to fire `delay` from now, replacing any pending deadline.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        self.deadlines[kind.slot()] = Some(self.now + delay);
    }

    /// Disarm `kind`. Returns whether it was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.deadlines[kind.slot()].take().is_some()
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.deadlines[kind.slot()].is_some()
    }

    /// Absolute deadline of a pending timer.
    pub fn deadline(&self, kind: TimerKind) -> Option<Duration> {
        self.deadlines[kind.slot()]
    }

    /// Move the clock forward.
    pub fn advance_clock(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Disarm and return the earliest timer that is due, if any.
    ///
    /// Call repeatedly until `None` to fire every due timer in deadline
    /// order.
    pub fn pop_due(&mut self) -> Option<TimerKind> {
        let kind = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.deadline(kind).map(|at| (at, kind)))
            .filter(|(at, _)| *at <= self.now)
            .min_by_key(|(at, _)| *at)
            .map(|(_, kind)| kind)?;

        self.cancel(kind);
        Some(kind)
    }
}
