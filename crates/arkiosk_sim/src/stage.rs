//! Headless stage and overlay used by the simulator.
//!
//! `SimStage` stands in for the rendering and tracking engine: it hands out
//! handles, keeps track of what is attached, live and playing, and completes
//! content requests after a fixed latency by posting back to the
//! orchestrator's queue. Every call is logged.

use std::collections::BTreeSet;
use std::time::Duration;

use glam::{Quat, Vec3};
use tracing::{debug, info, warn};

use arkiosk_core::host::{
    ClipId, ContentRequest, EngineFault, EngineResult, LoadedContent, ModelInstance, NodeId,
    Overlay, ResourceId, Stage, StartError, VideoId, VideoInstance,
};
use arkiosk_core::models::CareerId;
use arkiosk_core::orchestrator::EventSender;

/// Intrinsic size reported for every simulated video.
const VIDEO_SIZE: (u32, u32) = (1920, 1080);

/// Visitor walks around the marker at this angular speed (rad/s).
const ORBIT_SPEED: f32 = 0.35;
const ORBIT_RADIUS: f32 = 1.6;
const CAMERA_HEIGHT: f32 = 0.45;

#[derive(Debug)]
struct PendingLoad {
    due: Duration,
    request: ContentRequest,
}

#[derive(Debug)]
pub struct SimStage {
    events: Option<EventSender>,
    latency: Duration,
    deny_camera: bool,
    clock: Duration,
    next_handle: u64,
    pending: Vec<PendingLoad>,
    nodes: BTreeSet<NodeId>,
    attached: BTreeSet<NodeId>,
    live: BTreeSet<ResourceId>,
    videos: BTreeSet<VideoId>,
    playing: BTreeSet<VideoId>,
    calls: u64,
}

impl SimStage {
    pub fn new(latency: Duration, deny_camera: bool) -> Self {
        Self {
            events: None,
            latency,
            deny_camera,
            clock: Duration::ZERO,
            next_handle: 1,
            pending: Vec::new(),
            nodes: BTreeSet::new(),
            attached: BTreeSet::new(),
            live: BTreeSet::new(),
            videos: BTreeSet::new(),
            playing: BTreeSet::new(),
            calls: 0,
        }
    }

    /// Route load completions to an orchestrator.
    pub fn connect(&mut self, events: EventSender) {
        self.events = Some(events);
    }

    /// Move the engine clock and complete loads that are due.
    pub fn tick(&mut self, delta: Duration) {
        self.clock += delta;

        let now = self.clock;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|load| load.due <= now);
        self.pending = waiting;

        for load in due {
            let loaded = self.instantiate(&load.request);
            let Some(events) = &self.events else {
                warn!("Load for {} finished with no orchestrator connected", loaded.career);
                continue;
            };
            let token = loaded.token;
            let has_video = loaded.video.is_some();
            info!(
                "Content ready for {} {} ({} resources)",
                loaded.career,
                token,
                loaded.resources().count()
            );
            events.content_loaded(loaded);
            if has_video {
                events.video_metadata(token, VIDEO_SIZE.0, VIDEO_SIZE.1);
            }
        }
    }

    pub fn live_resources(&self) -> usize {
        self.live.len()
    }

    pub fn attached_nodes(&self) -> usize {
        self.attached.len()
    }

    pub fn playing_videos(&self) -> usize {
        self.playing.len()
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    fn handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn resource(&mut self) -> ResourceId {
        let id = ResourceId(self.handle());
        self.live.insert(id);
        id
    }

    fn node(&mut self) -> NodeId {
        let id = NodeId(self.handle());
        self.nodes.insert(id);
        id
    }

    fn instantiate(&mut self, request: &ContentRequest) -> LoadedContent {
        let model = request.entry.model.as_ref().map(|asset| {
            let root = self.node();
            let clip = asset
                .animation_duration
                .filter(|d| *d > 0.0)
                .map(|_| ClipId(self.handle()));
            // geometry and material
            let resources = vec![self.resource(), self.resource()];
            ModelInstance {
                root,
                clip,
                resources,
            }
        });

        let video = request.entry.video.as_ref().map(|_| {
            let element = VideoId(self.handle());
            self.videos.insert(element);
            let surface = self.node();
            // texture and media element
            let resources = vec![self.resource(), self.resource()];
            VideoInstance {
                element,
                surface,
                resources,
            }
        });

        LoadedContent {
            token: request.token,
            career: request.career.clone(),
            model,
            video,
        }
    }

    fn check_node(&self, operation: &'static str, node: NodeId) -> EngineResult<()> {
        if self.nodes.contains(&node) {
            Ok(())
        } else {
            Err(EngineFault::unknown_handle(operation, node.0))
        }
    }

    fn check_video(&self, operation: &'static str, video: VideoId) -> EngineResult<()> {
        if self.videos.contains(&video) {
            Ok(())
        } else {
            Err(EngineFault::unknown_handle(operation, video.0))
        }
    }

    fn record(&mut self, call: std::fmt::Arguments<'_>) {
        self.calls += 1;
        debug!(target: "stage", "{}", call);
    }
}

impl Stage for SimStage {
    fn start_tracking(&mut self) -> Result<(), StartError> {
        self.record(format_args!("start_tracking"));
        if self.deny_camera {
            return Err(StartError::permission_denied("camera access denied"));
        }
        Ok(())
    }

    fn request_content(&mut self, request: ContentRequest) -> EngineResult<()> {
        self.record(format_args!(
            "request_content {} {}",
            request.career, request.token
        ));
        self.pending.push(PendingLoad {
            due: self.clock + self.latency,
            request,
        });
        Ok(())
    }

    fn attach(&mut self, node: NodeId) -> EngineResult<()> {
        self.record(format_args!("attach {}", node));
        self.check_node("attach", node)?;
        self.attached.insert(node);
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> EngineResult<()> {
        self.record(format_args!("detach {}", node));
        if self.attached.remove(&node) {
            Ok(())
        } else {
            Err(EngineFault::unknown_handle("detach", node.0))
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> EngineResult<()> {
        self.record(format_args!("set_visible {} {}", node, visible));
        self.check_node("set_visible", node)
    }

    fn set_position_y(&mut self, node: NodeId, y: f32) -> EngineResult<()> {
        self.record(format_args!("set_position_y {} {:.3}", node, y));
        self.check_node("set_position_y", node)
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) -> EngineResult<()> {
        self.record(format_args!("set_scale {} {}", node, scale));
        self.check_node("set_scale", node)
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Quat) -> EngineResult<()> {
        self.calls += 1;
        // Sent every frame; too noisy for debug
        tracing::trace!(target: "stage", "set_rotation {} {}", node, rotation);
        self.check_node("set_rotation", node)
    }

    fn dispose(&mut self, resource: ResourceId) -> EngineResult<()> {
        self.record(format_args!("dispose {}", resource));
        if self.live.remove(&resource) {
            Ok(())
        } else {
            Err(EngineFault::unknown_handle("dispose", resource.0))
        }
    }

    fn play_video(&mut self, video: VideoId) -> EngineResult<()> {
        self.record(format_args!("play {}", video));
        self.check_video("play_video", video)?;
        self.playing.insert(video);
        Ok(())
    }

    fn pause_video(&mut self, video: VideoId) -> EngineResult<()> {
        self.record(format_args!("pause {}", video));
        self.check_video("pause_video", video)?;
        self.playing.remove(&video);
        Ok(())
    }

    fn seek_video(&mut self, video: VideoId, seconds: f64) -> EngineResult<()> {
        self.record(format_args!("seek {} {:.2}s", video, seconds));
        self.check_video("seek_video", video)
    }

    fn set_animation_time(&mut self, clip: ClipId, seconds: f32) -> EngineResult<()> {
        self.calls += 1;
        tracing::trace!(target: "stage", "set_animation_time {} {:.3}", clip, seconds);
        Ok(())
    }

    fn camera_offset(&self) -> EngineResult<Vec3> {
        let angle = self.clock.as_secs_f32() * ORBIT_SPEED;
        Ok(Vec3::new(
            angle.sin() * ORBIT_RADIUS,
            CAMERA_HEIGHT,
            angle.cos() * ORBIT_RADIUS,
        ))
    }
}

/// Overlay that writes UI changes to the log.
#[derive(Debug, Default)]
pub struct ConsoleOverlay {
    enabled: BTreeSet<CareerId>,
    last_error: Option<String>,
}

impl ConsoleOverlay {
    pub fn enabled_careers(&self) -> impl Iterator<Item = &CareerId> {
        self.enabled.iter()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl Overlay for ConsoleOverlay {
    fn show_scan_guidance(&mut self) {
        info!(target: "overlay", "Scan guidance shown");
    }

    fn fade_scan_guidance(&mut self, duration: Duration) {
        info!(target: "overlay", "Scan guidance fading over {:?}", duration);
    }

    fn hide_scan_guidance(&mut self) {
        info!(target: "overlay", "Scan guidance hidden");
    }

    fn set_career_enabled(&mut self, career: &CareerId, enabled: bool) {
        if enabled {
            self.enabled.insert(career.clone());
        } else {
            self.enabled.remove(career);
        }
        info!(
            target: "overlay",
            "Career button {} {}",
            career,
            if enabled { "enabled" } else { "disabled" }
        );
    }

    fn show_error(&mut self, message: &str) {
        warn!(target: "overlay", "Error shown: {}", message);
        self.last_error = Some(message.to_string());
    }
}
