//! Marker found/lost transitions.

use std::time::Duration;

use tracing::{debug, info};

use super::gate::AutoplayGate;
use super::scan::ScanGuidance;
use crate::config::TimingSettings;
use crate::host::Overlay;
use crate::models::{PlaybackState, TrackingState};
use crate::timers::{TimerKind, TimerSet};

/// What playback should do after the marker is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundDecision {
    /// Leave playback as it is.
    Hold,
    /// Continue a tracking-loss pause right away.
    ResumeNow,
    /// Start bound content after the settle delay.
    ScheduleStart,
}

/// Applies found/lost choreography and decides on playback.
#[derive(Debug)]
pub struct TrackingStateMachine {
    state: TrackingState,
    scan_fade: Duration,
    settle_delay: Duration,
    transitions: u64,
}

impl TrackingStateMachine {
    pub fn new(timing: &TimingSettings) -> Self {
        Self {
            state: TrackingState::Lost,
            scan_fade: timing.scan_fade(),
            settle_delay: timing.settle_delay(),
            transitions: 0,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn is_found(&self) -> bool {
        self.state == TrackingState::Found
    }

    /// Accepted (non-duplicate) transitions so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Lost→Found. Returns `false` for a duplicate signal.
    ///
    /// Cancels a pending settle start and fades the scan guidance out
    /// unless it is suppressed.
    pub fn found<O: Overlay>(
        &mut self,
        overlay: &mut O,
        timers: &mut TimerSet,
        scan: &mut ScanGuidance,
    ) -> bool {
        if self.is_found() {
            debug!("Duplicate target found ignored");
            return false;
        }
        self.state = TrackingState::Found;
        self.transitions += 1;
        info!("Target found");

        timers.cancel(TimerKind::SettleStart);
        if scan.begin_fade(overlay, self.scan_fade) {
            timers.schedule(TimerKind::ScanFade, self.scan_fade);
        }
        true
    }

    /// Found→Lost. Returns `false` for a duplicate signal.
    ///
    /// Cancels pending timers and hides the scan guidance immediately.
    pub fn lost<O: Overlay>(
        &mut self,
        overlay: &mut O,
        timers: &mut TimerSet,
        scan: &mut ScanGuidance,
    ) -> bool {
        if !self.is_found() {
            debug!("Duplicate target lost ignored");
            return false;
        }
        self.state = TrackingState::Lost;
        self.transitions += 1;
        info!("Target lost");

        timers.cancel(TimerKind::SettleStart);
        timers.cancel(TimerKind::ScanFade);
        scan.hide(overlay);
        true
    }

    /// Playback decision after a found transition.
    pub fn decide_found(
        &self,
        gate: &AutoplayGate,
        playback: PlaybackState,
        content_bound: bool,
    ) -> FoundDecision {
        if !gate.is_enabled() || !content_bound {
            return FoundDecision::Hold;
        }
        match playback {
            PlaybackState::PausedByTrackingLoss => FoundDecision::ResumeNow,
            PlaybackState::WaitingForMarker => FoundDecision::ScheduleStart,
            _ => FoundDecision::Hold,
        }
    }

    /// Whether a lost transition should freeze playback.
    pub fn should_freeze_on_lost(&self, gate: &AutoplayGate, content_playing: bool) -> bool {
        gate.is_enabled() && content_playing
    }

    /// Arm the settle timer, replacing a pending one.
    pub fn schedule_start(&self, timers: &mut TimerSet) {
        debug!("Playback start in {:?}", self.settle_delay);
        timers.schedule(TimerKind::SettleStart, self.settle_delay);
    }
}
