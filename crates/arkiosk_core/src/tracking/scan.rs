//! Scan-guidance visibility.

use std::time::Duration;

use crate::host::Overlay;

/// Tracks what the overlay is showing for scan guidance.
///
/// While suppressed (an overlay covers the AR view) guidance is never
/// shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanGuidance {
    suppressed: bool,
    visible: bool,
    fading: bool,
}

impl ScanGuidance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// On display, including while fading out.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }

    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    /// Show guidance unless suppressed. Returns whether it is now shown.
    pub fn show<O: Overlay>(&mut self, overlay: &mut O) -> bool {
        if self.suppressed {
            return false;
        }
        overlay.show_scan_guidance();
        self.visible = true;
        self.fading = false;
        true
    }

    /// Remove guidance from display immediately.
    pub fn hide<O: Overlay>(&mut self, overlay: &mut O) {
        if self.visible {
            overlay.hide_scan_guidance();
        }
        self.visible = false;
        self.fading = false;
    }

    /// Start fading out. Returns `false` if there was nothing to fade.
    pub fn begin_fade<O: Overlay>(&mut self, overlay: &mut O, duration: Duration) -> bool {
        if self.suppressed || !self.visible || self.fading {
            return false;
        }
        overlay.fade_scan_guidance(duration);
        self.fading = true;
        true
    }

    /// Remove guidance from display once a fade has run its course.
    pub fn finish_fade<O: Overlay>(&mut self, overlay: &mut O) {
        if self.fading {
            self.hide(overlay);
        }
    }
}
