//! The unit of content bound to the anchor.

use crate::host::{ModelInstance, NodeId, ResourceId, VideoId, VideoInstance};
use crate::models::{CareerId, LoadToken};
use crate::playback::AnimationTimeline;

/// Model, optional timeline and video currently bound to the anchor.
///
/// Owned exclusively by [`ContentBinder`](super::ContentBinder). The
/// `resources` list is the complete set of engine handles to release when
/// this content is disposed.
#[derive(Debug)]
pub struct AnchorContent {
    career: CareerId,
    token: LoadToken,
    model: Option<ModelInstance>,
    video: Option<VideoInstance>,
    timeline: Option<AnimationTimeline>,
    min_y: f32,
    resources: Vec<ResourceId>,
    visible: bool,
    video_playing: bool,
    layout_applied: bool,
}

impl AnchorContent {
    pub(crate) fn new(
        career: CareerId,
        token: LoadToken,
        model: Option<ModelInstance>,
        video: Option<VideoInstance>,
        timeline: Option<AnimationTimeline>,
        min_y: f32,
        resources: Vec<ResourceId>,
    ) -> Self {
        Self {
            career,
            token,
            model,
            video,
            timeline,
            min_y,
            resources,
            visible: false,
            video_playing: false,
            layout_applied: false,
        }
    }

    pub fn career(&self) -> &CareerId {
        &self.career
    }

    /// Token of the load that produced this content.
    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn model(&self) -> Option<&ModelInstance> {
        self.model.as_ref()
    }

    pub fn video(&self) -> Option<&VideoInstance> {
        self.video.as_ref()
    }

    pub fn model_root(&self) -> Option<NodeId> {
        self.model.as_ref().map(|m| m.root)
    }

    pub fn video_element(&self) -> Option<VideoId> {
        self.video.as_ref().map(|v| v.element)
    }

    pub fn video_surface(&self) -> Option<NodeId> {
        self.video.as_ref().map(|v| v.surface)
    }

    /// Nodes attached under the anchor, model first.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.model_root().into_iter().chain(self.video_surface())
    }

    pub fn timeline(&self) -> Option<&AnimationTimeline> {
        self.timeline.as_ref()
    }

    pub(crate) fn timeline_mut(&mut self) -> Option<&mut AnimationTimeline> {
        self.timeline.as_mut()
    }

    /// Lowest point of the model in model space.
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    pub fn resources(&self) -> &[ResourceId] {
        &self.resources
    }

    pub(crate) fn take_resources(&mut self) -> Vec<ResourceId> {
        std::mem::take(&mut self.resources)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_video_playing(&self) -> bool {
        self.video_playing
    }

    pub(crate) fn set_video_playing(&mut self, playing: bool) {
        self.video_playing = playing;
    }

    /// Video playing, or for model-only content the timeline running.
    pub fn is_playing(&self) -> bool {
        self.video_playing || self.timeline.as_ref().is_some_and(AnimationTimeline::is_running)
    }

    pub fn layout_applied(&self) -> bool {
        self.layout_applied
    }

    pub(crate) fn mark_layout_applied(&mut self) {
        self.layout_applied = true;
    }
}
