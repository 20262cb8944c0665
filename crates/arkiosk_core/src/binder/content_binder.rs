//! Attach, lay out and dispose anchor content.

use glam::Vec3;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::content::AnchorContent;
use crate::config::LayoutSettings;
use crate::host::{absorb, LoadedContent, ResourceId, Stage};
use crate::models::AssetEntry;
use crate::playback::{AnimationTimeline, PlaybackSynchronizer};

/// Counters for leak auditing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BinderStats {
    /// Contents attached to the anchor.
    pub contents_bound: u64,
    /// Bound contents fully disposed.
    pub contents_disposed: u64,
    /// Stale loads disposed without being attached.
    pub loads_discarded: u64,
    /// Resource handles released to the engine.
    pub handles_released: u64,
    /// Resource handles currently owned.
    pub handles_live: u64,
}

/// Owns the one piece of content bound to the anchor.
#[derive(Debug)]
pub struct ContentBinder {
    current: Option<AnchorContent>,
    video_width: f32,
    model_nudge: f32,
    stats: BinderStats,
}

impl ContentBinder {
    pub fn new(layout: &LayoutSettings) -> Self {
        Self {
            current: None,
            video_width: layout.video_width as f32,
            model_nudge: layout.model_nudge as f32,
            stats: BinderStats::default(),
        }
    }

    pub fn current(&self) -> Option<&AnchorContent> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut AnchorContent> {
        self.current.as_mut()
    }

    pub fn is_bound(&self) -> bool {
        self.current.is_some()
    }

    pub fn stats(&self) -> BinderStats {
        self.stats
    }

    /// Replace the bound content with a freshly loaded one.
    ///
    /// The previous content is disposed before anything new is attached.
    /// New content starts hidden and paused; an animated model gets a
    /// frozen timeline.
    pub fn bind<S: Stage>(
        &mut self,
        stage: &mut S,
        entry: &AssetEntry,
        loaded: LoadedContent,
    ) -> Option<&AnchorContent> {
        self.dispose_current(stage);

        if loaded.is_empty() {
            debug!("Nothing to bind for {}", loaded.career);
            return None;
        }

        let resources: Vec<_> = loaded.resources().collect();
        let model_asset = entry.model.as_deref();
        let min_y = model_asset.map_or(0.0, |m| m.min_y);

        let timeline = loaded.model.as_ref().and_then(|model| {
            let clip = model.clip?;
            let duration = model_asset?.animation_duration?;
            Some(AnimationTimeline::new(clip, duration))
        });

        let LoadedContent {
            token,
            career,
            model,
            video,
        } = loaded;

        let content = AnchorContent::new(career, token, model, video, timeline, min_y, resources);

        for node in content.nodes() {
            absorb("set_visible", stage.set_visible(node, false));
            absorb("attach", stage.attach(node));
        }
        if let Some(video) = content.video_element() {
            absorb("pause_video", stage.pause_video(video));
        }

        self.stats.contents_bound += 1;
        self.stats.handles_live += content.resources().len() as u64;
        info!(
            "Bound {} (model: {}, video: {}, animated: {})",
            content.career(),
            content.model().is_some(),
            content.video().is_some(),
            content.timeline().is_some()
        );

        self.current = Some(content);
        self.current.as_ref()
    }

    /// One-time layout pass once the video's dimensions are known.
    ///
    /// Sizes the video surface to the configured width and the video's
    /// aspect ratio, then lifts the model so its lowest point sits just
    /// above the surface's top edge. Returns whether layout was applied.
    pub fn apply_video_metadata<S: Stage>(&mut self, stage: &mut S, width: u32, height: u32) -> bool {
        let video_width = self.video_width;
        let nudge = self.model_nudge;

        let Some(content) = self.current.as_mut() else {
            return false;
        };
        if content.layout_applied() {
            debug!("Layout already applied for {}; ignoring metadata", content.career());
            return false;
        }
        if width == 0 || height == 0 {
            warn!(
                "Ignoring zero-sized video metadata ({}x{}) for {}",
                width,
                height,
                content.career()
            );
            return false;
        }

        let surface_height = video_width * height as f32 / width as f32;
        if let Some(surface) = content.video_surface() {
            absorb(
                "set_scale",
                stage.set_scale(surface, Vec3::new(video_width, surface_height, 1.0)),
            );
        }
        if let Some(root) = content.model_root() {
            let y = surface_height / 2.0 + nudge - content.min_y();
            absorb("set_position_y", stage.set_position_y(root, y));
        }

        content.mark_layout_applied();
        true
    }

    /// Show the bound content.
    pub fn reveal<S: Stage>(&mut self, stage: &mut S) {
        if let Some(content) = self.current.as_mut() {
            for node in content.nodes() {
                absorb("set_visible", stage.set_visible(node, true));
            }
            content.set_visible(true);
        }
    }

    /// Stop the bound content.
    ///
    /// With `keep_paused` the content stays bound and frozen; otherwise it
    /// is disposed.
    pub fn release<S: Stage>(
        &mut self,
        stage: &mut S,
        sync: &mut PlaybackSynchronizer,
        keep_paused: bool,
    ) {
        if keep_paused {
            if let Some(content) = self.current.as_mut() {
                sync.freeze(stage, content);
            }
        } else {
            self.dispose_current(stage);
        }
    }

    /// Dispose a load that lost the token race without attaching it.
    pub fn discard<S: Stage>(&mut self, stage: &mut S, loaded: LoadedContent) {
        debug!("Discarding stale load {} for {}", loaded.token, loaded.career);
        let resources: Vec<_> = loaded.resources().collect();
        self.release_handles(stage, resources);
        self.stats.loads_discarded += 1;
    }

    fn dispose_current<S: Stage>(&mut self, stage: &mut S) {
        let Some(mut content) = self.current.take() else {
            return;
        };

        for node in content.nodes() {
            absorb("detach", stage.detach(node));
        }
        if let Some(video) = content.video_element() {
            absorb("pause_video", stage.pause_video(video));
        }

        let resources = content.take_resources();
        self.stats.handles_live = self.stats.handles_live.saturating_sub(resources.len() as u64);
        self.release_handles(stage, resources);
        self.stats.contents_disposed += 1;
        debug!("Disposed content for {}", content.career());
    }

    fn release_handles<S: Stage>(&mut self, stage: &mut S, resources: Vec<ResourceId>) {
        for resource in resources {
            absorb("dispose", stage.dispose(resource));
            self.stats.handles_released += 1;
        }
    }
}
