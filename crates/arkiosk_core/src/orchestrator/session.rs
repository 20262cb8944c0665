//! Mutable session state and its serializable summary.

use serde::Serialize;

use crate::binder::BinderStats;
use crate::models::{CareerId, LoadToken, PlaybackState, TrackingState};
use crate::playback::SyncStats;
use crate::tracking::{AutoplayGate, ScanGuidance};

/// Navigation-level state of one kiosk session.
#[derive(Debug, Default)]
pub struct OrchestratorSession {
    pub(crate) current_career: Option<CareerId>,
    pub(crate) last_career: Option<CareerId>,
    pub(crate) gate: AutoplayGate,
    pub(crate) scan: ScanGuidance,
    pub(crate) token: LoadToken,
}

impl OrchestratorSession {
    pub fn current_career(&self) -> Option<&CareerId> {
        self.current_career.as_ref()
    }

    /// Career whose content was bound most recently.
    pub fn last_career(&self) -> Option<&CareerId> {
        self.last_career.as_ref()
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    pub fn scan_ui_suppressed(&self) -> bool {
        self.scan.is_suppressed()
    }

    pub fn scan_ui_visible(&self) -> bool {
        self.scan.is_visible()
    }

    /// Token of the newest content request.
    pub fn token(&self) -> LoadToken {
        self.token
    }

    /// Invalidate any in-flight load and return the new token.
    pub(crate) fn bump_token(&mut self) -> LoadToken {
        self.token = self.token.next();
        self.token
    }
}

/// Point-in-time view of the orchestrator, for logs and tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub tracking: TrackingState,
    pub playback: PlaybackState,
    pub current_career: Option<CareerId>,
    pub last_career: Option<CareerId>,
    pub bound_career: Option<CareerId>,
    pub autoplay_enabled: bool,
    pub scan_ui_suppressed: bool,
    pub scan_ui_visible: bool,
    pub load_token: LoadToken,
    pub clock_ms: u64,
    pub tracking_transitions: u64,
    pub binder: BinderStats,
    pub playback_stats: SyncStats,
}

impl SessionSummary {
    /// Pretty JSON rendering for logs and debug dumps.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
