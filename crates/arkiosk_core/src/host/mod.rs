//! Collaborator contracts implemented by the embedding host.
//!
//! The core never renders or tracks anything itself. It drives a [`Stage`]
//! (scene graph, tracking engine, media elements) and an [`Overlay`]
//! (scan guidance, menu buttons, error banner). Asynchronous answers from
//! the host come back as events through
//! [`EventSender`](crate::orchestrator::EventSender).

mod errors;
mod types;

pub use errors::{EngineFault, EngineResult, StartError};
pub use types::{
    ClipId, ContentRequest, LoadedContent, ModelInstance, NodeId, ResourceId, VideoId,
    VideoInstance,
};

use std::time::Duration;

use glam::{Quat, Vec3};

use crate::models::CareerId;

/// Rendering and tracking engine.
///
/// Every node is positioned in anchor space; the marker is one unit wide.
pub trait Stage {
    /// Start camera capture and marker tracking.
    fn start_tracking(&mut self) -> Result<(), StartError>;

    /// Begin instantiating content. Completion is posted as an event.
    fn request_content(&mut self, request: ContentRequest) -> EngineResult<()>;

    /// Attach a node under the anchor.
    fn attach(&mut self, node: NodeId) -> EngineResult<()>;

    /// Detach a node from the anchor.
    fn detach(&mut self, node: NodeId) -> EngineResult<()>;

    fn set_visible(&mut self, node: NodeId, visible: bool) -> EngineResult<()>;

    fn set_position_y(&mut self, node: NodeId, y: f32) -> EngineResult<()>;

    fn set_scale(&mut self, node: NodeId, scale: Vec3) -> EngineResult<()>;

    fn set_rotation(&mut self, node: NodeId, rotation: Quat) -> EngineResult<()>;

    /// Release a resource. The handle is invalid afterwards.
    fn dispose(&mut self, resource: ResourceId) -> EngineResult<()>;

    fn play_video(&mut self, video: VideoId) -> EngineResult<()>;

    fn pause_video(&mut self, video: VideoId) -> EngineResult<()>;

    /// Set the playback position in seconds.
    fn seek_video(&mut self, video: VideoId, seconds: f64) -> EngineResult<()>;

    /// Pose a clip at the given time in seconds.
    fn set_animation_time(&mut self, clip: ClipId, seconds: f32) -> EngineResult<()>;

    /// Camera position relative to the anchor, while the marker is tracked.
    fn camera_offset(&self) -> EngineResult<Vec3>;
}

/// UI layer drawn over the camera feed.
pub trait Overlay {
    fn show_scan_guidance(&mut self);

    /// Start fading the scan guidance out over `duration`.
    fn fade_scan_guidance(&mut self, duration: Duration);

    /// Remove the scan guidance from display.
    fn hide_scan_guidance(&mut self);

    /// Enable or disable a career's menu button.
    fn set_career_enabled(&mut self, career: &CareerId, enabled: bool);

    /// Show a blocking error message.
    fn show_error(&mut self, message: &str);
}

/// Log an engine fault and turn the result into an option.
pub(crate) fn absorb<T>(operation: &str, result: EngineResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(fault) => {
            tracing::warn!("{} failed: {}", operation, fault);
            None
        }
    }
}
