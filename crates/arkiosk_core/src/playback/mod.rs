//! Video and animation playback.

mod synchronizer;
mod timeline;

pub use synchronizer::{PlaybackSynchronizer, SyncStats};
pub use timeline::AnimationTimeline;
