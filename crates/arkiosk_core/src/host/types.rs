//! Handles and payloads exchanged with the stage.

use std::fmt;

use crate::models::{AssetEntry, CareerId, LoadToken};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

handle!(
    /// Scene-graph node (model root or video surface).
    NodeId,
    "node:"
);
handle!(
    /// Disposable engine resource (geometry, material, texture, decoder).
    ResourceId,
    "res:"
);
handle!(
    /// Video element.
    VideoId,
    "video:"
);
handle!(
    /// Animation clip on a model instance.
    ClipId,
    "clip:"
);

/// Ask the stage to instantiate engine content for a career.
///
/// The stage answers asynchronously by posting `Event::ContentLoaded` with
/// the same token, or `Event::ContentFailed`.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub token: LoadToken,
    pub career: CareerId,
    pub entry: AssetEntry,
}

/// Instantiated model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    /// Root node attached under the anchor.
    pub root: NodeId,
    /// First animation clip, if the model is animated.
    pub clip: Option<ClipId>,
    /// Every resource owned by this instance.
    pub resources: Vec<ResourceId>,
}

/// Instantiated video element with its display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInstance {
    pub element: VideoId,
    /// Plane the video is textured onto.
    pub surface: NodeId,
    /// Every resource owned by this instance (decoder, texture, plane).
    pub resources: Vec<ResourceId>,
}

/// Stage's answer to a [`ContentRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContent {
    pub token: LoadToken,
    pub career: CareerId,
    pub model: Option<ModelInstance>,
    pub video: Option<VideoInstance>,
}

impl LoadedContent {
    /// All owned resources, model first.
    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        let model = self.model.iter().flat_map(|m| m.resources.iter().copied());
        let video = self.video.iter().flat_map(|v| v.resources.iter().copied());
        model.chain(video)
    }

    /// Neither a model nor a video was instantiated.
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.video.is_none()
    }
}
