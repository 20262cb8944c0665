//! Resolved asset structures.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::career::{AssetKind, CareerId};

/// Container format of a fetched video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoContainer {
    /// ISO base media (MP4/MOV).
    Mp4,
    /// Matroska/WebM.
    WebM,
}

impl fmt::Display for VideoContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoContainer::Mp4 => write!(f, "mp4"),
            VideoContainer::WebM => write!(f, "webm"),
        }
    }
}

/// A fetched and decoded 3D model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    /// Candidate filename that resolved.
    pub file: String,
    /// Raw model bytes (glTF JSON or GLB).
    pub bytes: Vec<u8>,
    /// Lowest point of the model in its own space, node transforms applied.
    pub min_y: f32,
    /// Duration of the longest animation clip, if the model is animated.
    pub animation_duration: Option<f32>,
}

/// A fetched video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoAsset {
    /// Candidate filename that resolved.
    pub file: String,
    /// Raw container bytes.
    pub bytes: Vec<u8>,
    /// Sniffed container format.
    pub container: VideoContainer,
}

/// Resolved resources for one career.
///
/// Populated once by preload and read-only afterwards. Handles are shared,
/// so cloning an entry never copies asset bytes.
#[derive(Debug, Clone, Default)]
pub struct AssetEntry {
    /// Resolved model, absent if every candidate failed.
    pub model: Option<Arc<ModelAsset>>,
    /// Resolved video, absent if every candidate failed.
    pub video: Option<Arc<VideoAsset>>,
}

impl AssetEntry {
    /// Both model and video resolved.
    pub fn is_ready(&self) -> bool {
        self.model.is_some() && self.video.is_some()
    }

    /// Neither slot resolved.
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.video.is_none()
    }

    /// Whether the slot for `kind` resolved.
    pub fn has(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::Model => self.model.is_some(),
            AssetKind::Video => self.video.is_some(),
        }
    }
}

/// Career → resolved assets, ordered by career id.
pub type AssetMap = BTreeMap<CareerId, AssetEntry>;
