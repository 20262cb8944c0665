//! Coordinated start/stop of video and animation.

use serde::Serialize;
use tracing::{debug, warn};

use crate::binder::AnchorContent;
use crate::host::{absorb, Stage};

/// Counters for audit and the session summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub starts: u64,
    pub resumes: u64,
    pub freezes: u64,
    pub refused_plays: u64,
}

/// Keeps a video and an animation timeline in lockstep.
///
/// Both are always started, resumed and frozen in the same call. There is
/// no per-frame correction between video time and animation time.
#[derive(Debug, Default)]
pub struct PlaybackSynchronizer {
    stats: SyncStats,
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Play both from the beginning.
    ///
    /// If the video refuses to play the content is left frozen and `false`
    /// is returned.
    pub fn start<S: Stage>(&mut self, stage: &mut S, content: &mut AnchorContent) -> bool {
        if let Some(video) = content.video_element() {
            absorb("seek_video", stage.seek_video(video, 0.0));
        }
        if let Some(timeline) = content.timeline_mut() {
            timeline.rewind();
            absorb(
                "set_animation_time",
                stage.set_animation_time(timeline.clip(), 0.0),
            );
        }

        if !self.play(stage, content) {
            return false;
        }

        self.stats.starts += 1;
        debug!("Started playback for {}", content.career());
        true
    }

    /// Continue both from where they were frozen.
    pub fn resume<S: Stage>(&mut self, stage: &mut S, content: &mut AnchorContent) -> bool {
        if !self.play(stage, content) {
            return false;
        }

        self.stats.resumes += 1;
        debug!("Resumed playback for {}", content.career());
        true
    }

    /// Pause the video and stop the timeline.
    pub fn freeze<S: Stage>(&mut self, stage: &mut S, content: &mut AnchorContent) {
        if let Some(video) = content.video_element() {
            absorb("pause_video", stage.pause_video(video));
        }
        content.set_video_playing(false);
        if let Some(timeline) = content.timeline_mut() {
            timeline.set_time_scale(0.0);
        }

        self.stats.freezes += 1;
    }

    fn play<S: Stage>(&mut self, stage: &mut S, content: &mut AnchorContent) -> bool {
        if let Some(video) = content.video_element() {
            if let Err(fault) = stage.play_video(video) {
                warn!("Video for {} refused to play: {}", content.career(), fault);
                self.stats.refused_plays += 1;
                self.freeze(stage, content);
                return false;
            }
            content.set_video_playing(true);
        }
        if let Some(timeline) = content.timeline_mut() {
            timeline.set_time_scale(1.0);
        }
        true
    }
}
