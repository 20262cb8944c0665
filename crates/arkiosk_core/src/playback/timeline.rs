//! Animation timeline driven by the frame clock.

use crate::host::ClipId;

/// Looping playhead for one animation clip.
///
/// A time-scale of zero freezes the clip in place; playback is only ever
/// started or stopped as a whole, never nudged.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTimeline {
    clip: ClipId,
    duration: f32,
    time: f32,
    time_scale: f32,
}

impl AnimationTimeline {
    /// Create a frozen timeline at time zero.
    pub fn new(clip: ClipId, duration: f32) -> Self {
        Self {
            clip,
            duration,
            time: 0.0,
            time_scale: 0.0,
        }
    }

    pub fn clip(&self) -> ClipId {
        self.clip
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Playhead in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_running(&self) -> bool {
        self.time_scale > 0.0
    }

    pub fn rewind(&mut self) {
        self.time = 0.0;
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale.max(0.0);
    }

    /// Move the playhead by `dt` seconds, wrapping at the clip end.
    ///
    /// Returns whether the playhead moved.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.is_running() || dt <= 0.0 {
            return false;
        }
        self.time += dt * self.time_scale;
        if self.duration > 0.0 {
            self.time = self.time.rem_euclid(self.duration);
        }
        true
    }
}
