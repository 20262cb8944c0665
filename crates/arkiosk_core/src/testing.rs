//! Recording fakes of the host collaborators, for unit tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glam::{Quat, Vec3};
use parking_lot::Mutex;
use serde_json::json;

use crate::assets::{AssetFetcher, FetchError, FetchResult};
use crate::host::{
    ClipId, ContentRequest, EngineFault, EngineResult, LoadedContent, ModelInstance, NodeId,
    Overlay, ResourceId, Stage, StartError, VideoId, VideoInstance,
};
use crate::models::{AssetEntry, CareerId, ModelAsset, VideoAsset, VideoContainer};

/// Stage that records every call and keeps a minimal scene model.
#[derive(Debug)]
pub struct FakeStage {
    next_id: u64,
    calls: Vec<String>,
    pub requests: Vec<ContentRequest>,
    attached: BTreeSet<NodeId>,
    visible: BTreeSet<NodeId>,
    disposed: BTreeSet<ResourceId>,
    pub double_disposals: usize,
    playing: BTreeSet<VideoId>,
    video_positions: HashMap<VideoId, f64>,
    animation_times: HashMap<ClipId, f32>,
    positions: HashMap<NodeId, f32>,
    scales: HashMap<NodeId, Vec3>,
    rotations: HashMap<NodeId, Quat>,
    pub deny_camera: bool,
    pub refuse_play: bool,
    pub fail_requests: bool,
    pub camera: Option<Vec3>,
}

impl FakeStage {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            calls: Vec::new(),
            requests: Vec::new(),
            attached: BTreeSet::new(),
            visible: BTreeSet::new(),
            disposed: BTreeSet::new(),
            double_disposals: 0,
            playing: BTreeSet::new(),
            video_positions: HashMap::new(),
            animation_times: HashMap::new(),
            positions: HashMap::new(),
            scales: HashMap::new(),
            rotations: HashMap::new(),
            deny_camera: false,
            refuse_play: false,
            fail_requests: false,
            camera: Some(Vec3::new(0.0, 0.5, 2.0)),
        }
    }

    fn id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Build engine content for a request, as the real stage would.
    pub fn instantiate(&mut self, request: &ContentRequest) -> LoadedContent {
        let model = request.entry.model.as_ref().map(|asset| ModelInstance {
            root: NodeId(self.id()),
            clip: asset.animation_duration.map(|_| ClipId(self.id())),
            resources: vec![ResourceId(self.id()), ResourceId(self.id())],
        });
        let video = request.entry.video.as_ref().map(|_| VideoInstance {
            element: VideoId(self.id()),
            surface: NodeId(self.id()),
            resources: vec![ResourceId(self.id()), ResourceId(self.id())],
        });

        LoadedContent {
            token: request.token,
            career: request.career.clone(),
            model,
            video,
        }
    }

    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.attached.contains(&node)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.visible.contains(&node)
    }

    pub fn is_disposed(&self, resource: ResourceId) -> bool {
        self.disposed.contains(&resource)
    }

    pub fn disposed_count(&self) -> usize {
        self.disposed.len()
    }

    pub fn is_playing(&self, video: VideoId) -> bool {
        self.playing.contains(&video)
    }

    pub fn any_playing(&self) -> bool {
        !self.playing.is_empty()
    }

    pub fn video_position(&self, video: VideoId) -> Option<f64> {
        self.video_positions.get(&video).copied()
    }

    pub fn animation_time(&self, clip: ClipId) -> Option<f32> {
        self.animation_times.get(&clip).copied()
    }

    pub fn position_y(&self, node: NodeId) -> Option<f32> {
        self.positions.get(&node).copied()
    }

    pub fn scale(&self, node: NodeId) -> Option<Vec3> {
        self.scales.get(&node).copied()
    }

    pub fn rotation(&self, node: NodeId) -> Option<Quat> {
        self.rotations.get(&node).copied()
    }
}

impl Stage for FakeStage {
    fn start_tracking(&mut self) -> Result<(), StartError> {
        self.calls.push("start_tracking".into());
        if self.deny_camera {
            return Err(StartError::permission_denied("NotAllowedError"));
        }
        Ok(())
    }

    fn request_content(&mut self, request: ContentRequest) -> EngineResult<()> {
        self.calls
            .push(format!("request_content {} {}", request.career, request.token));
        if self.fail_requests {
            return Err(EngineFault::unavailable("loader offline"));
        }
        self.requests.push(request);
        Ok(())
    }

    fn attach(&mut self, node: NodeId) -> EngineResult<()> {
        self.calls.push(format!("attach {node}"));
        self.attached.insert(node);
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> EngineResult<()> {
        self.calls.push(format!("detach {node}"));
        if !self.attached.remove(&node) {
            return Err(EngineFault::unknown_handle("detach", node.0));
        }
        self.visible.remove(&node);
        Ok(())
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> EngineResult<()> {
        self.calls.push(format!("set_visible {node} {visible}"));
        if visible {
            self.visible.insert(node);
        } else {
            self.visible.remove(&node);
        }
        Ok(())
    }

    fn set_position_y(&mut self, node: NodeId, y: f32) -> EngineResult<()> {
        self.positions.insert(node, y);
        Ok(())
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) -> EngineResult<()> {
        self.scales.insert(node, scale);
        Ok(())
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Quat) -> EngineResult<()> {
        self.rotations.insert(node, rotation);
        Ok(())
    }

    fn dispose(&mut self, resource: ResourceId) -> EngineResult<()> {
        self.calls.push(format!("dispose {resource}"));
        if !self.disposed.insert(resource) {
            self.double_disposals += 1;
            return Err(EngineFault::unknown_handle("dispose", resource.0));
        }
        Ok(())
    }

    fn play_video(&mut self, video: VideoId) -> EngineResult<()> {
        self.calls.push(format!("play {video}"));
        if self.refuse_play {
            return Err(EngineFault::refused("play_video", "autoplay policy"));
        }
        self.playing.insert(video);
        Ok(())
    }

    fn pause_video(&mut self, video: VideoId) -> EngineResult<()> {
        self.calls.push(format!("pause {video}"));
        self.playing.remove(&video);
        Ok(())
    }

    fn seek_video(&mut self, video: VideoId, seconds: f64) -> EngineResult<()> {
        self.video_positions.insert(video, seconds);
        Ok(())
    }

    fn set_animation_time(&mut self, clip: ClipId, seconds: f32) -> EngineResult<()> {
        self.animation_times.insert(clip, seconds);
        Ok(())
    }

    fn camera_offset(&self) -> EngineResult<Vec3> {
        self.camera
            .ok_or_else(|| EngineFault::unavailable("camera pose unknown"))
    }
}

/// Overlay that records every call.
#[derive(Debug, Default)]
pub struct FakeOverlay {
    pub calls: Vec<String>,
    pub enabled: BTreeMap<CareerId, bool>,
    pub errors: Vec<String>,
    pub scan_shown: bool,
}

impl FakeOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Overlay for FakeOverlay {
    fn show_scan_guidance(&mut self) {
        self.calls.push("show_scan".into());
        self.scan_shown = true;
    }

    fn fade_scan_guidance(&mut self, duration: Duration) {
        self.calls.push(format!("fade_scan {duration:?}"));
    }

    fn hide_scan_guidance(&mut self) {
        self.calls.push("hide_scan".into());
        self.scan_shown = false;
    }

    fn set_career_enabled(&mut self, career: &CareerId, enabled: bool) {
        self.enabled.insert(career.clone(), enabled);
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// In-memory asset origin that records requests.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
    unavailable: AtomicBool,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(name.to_string(), bytes);
        self
    }

    /// Make every fetch fail hard.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl AssetFetcher for MemoryFetcher {
    async fn fetch(&self, name: &str) -> FetchResult<Vec<u8>> {
        self.requests.lock().push(name.to_string());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(FetchError::unavailable("origin offline"));
        }
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::not_found(name))
    }
}

/// glTF JSON with one unit cube (y in [-0.5, 0.5]) lifted by `lift`,
/// optionally with a 2.5 s translation animation.
pub fn sample_gltf(lift: f32, animated: bool) -> Vec<u8> {
    let mut doc = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0, "translation": [0.0, lift, 0.0] }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "buffers": [{
            "byteLength": 68,
            "uri": format!("data:application/octet-stream;base64,{}=", "A".repeat(91)),
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 44, "byteLength": 24 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [-0.5, -0.5, -0.5], "max": [0.5, 0.5, 0.5]
            },
            {
                "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
                "min": [0.0], "max": [2.5]
            },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ]
    });

    if animated {
        doc["animations"] = json!([{
            "channels": [{ "sampler": 0, "target": { "node": 0, "path": "translation" } }],
            "samplers": [{ "input": 1, "output": 2, "interpolation": "LINEAR" }]
        }]);
    }

    serde_json::to_vec(&doc).unwrap()
}

/// Minimal bytes with an MP4 `ftyp` box header.
pub fn sample_mp4() -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x18];
    bytes.extend_from_slice(b"ftypisom");
    bytes.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    bytes.extend_from_slice(b"isomiso2mp41");
    bytes
}

/// Asset entry with placeholder handles.
pub fn entry_with(model: bool, video: bool, animation_duration: Option<f32>) -> AssetEntry {
    AssetEntry {
        model: model.then(|| {
            Arc::new(ModelAsset {
                file: "models/sample.gltf".into(),
                bytes: Vec::new(),
                min_y: 0.0,
                animation_duration,
            })
        }),
        video: video.then(|| {
            Arc::new(VideoAsset {
                file: "videos/sample.mp4".into(),
                bytes: sample_mp4(),
                container: VideoContainer::Mp4,
            })
        }),
    }
}
