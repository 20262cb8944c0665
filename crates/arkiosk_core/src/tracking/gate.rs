//! Autoplay gate.

/// Whether tracking transitions may start or resume playback.
///
/// Closed while any overlay (menu, mini-game, contact, survey) covers the
/// AR view. Tracking choreography still runs while closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplayGate {
    enabled: bool,
}

impl AutoplayGate {
    /// A closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.enabled = true;
    }

    pub fn close(&mut self) {
        self.enabled = false;
    }

    pub fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
