//! Tracking and playback state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker tracking state, mutated only by tracking-engine callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    /// Marker not visible (initial).
    #[default]
    Lost,
    /// Marker locked on.
    Found,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingState::Lost => write!(f, "Lost"),
            TrackingState::Found => write!(f, "Found"),
        }
    }
}

/// Playback state of the orchestrator.
///
/// `Loading` is transient: it covers the gap between a career selection and
/// the content load completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing selected.
    #[default]
    Idle,
    /// Content for the current career is being instantiated.
    Loading,
    /// Content bound (or nothing to bind) and waiting for a start.
    WaitingForMarker,
    /// Video and animation running.
    Playing,
    /// Frozen because the visitor navigated to an overlay.
    PausedByBack,
    /// Frozen because the marker was lost mid-playback.
    PausedByTrackingLoss,
}

impl PlaybackState {
    /// Whether content is frozen mid-playback.
    pub fn is_paused(&self) -> bool {
        matches!(
            self,
            PlaybackState::PausedByBack | PlaybackState::PausedByTrackingLoss
        )
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "Idle"),
            PlaybackState::Loading => write!(f, "Loading"),
            PlaybackState::WaitingForMarker => write!(f, "WaitingForMarker"),
            PlaybackState::Playing => write!(f, "Playing"),
            PlaybackState::PausedByBack => write!(f, "PausedByBack"),
            PlaybackState::PausedByTrackingLoss => write!(f, "PausedByTrackingLoss"),
        }
    }
}

/// Monotonically increasing identifier of a content load.
///
/// A load completion is only applied if its token is still the session's
/// current token when it is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadToken(u64);

impl LoadToken {
    /// The token that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
