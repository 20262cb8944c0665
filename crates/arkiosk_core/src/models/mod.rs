//! Data models for the AR kiosk.
//!
//! This module contains the core data structures shared by every component:
//! - Career roster and asset kinds
//! - Resolved asset entries (model/video handles per career)
//! - Tracking and playback state enums, and the load token

mod assets;
mod career;
mod state;

// Re-export all public types
pub use assets::{AssetEntry, AssetMap, ModelAsset, VideoAsset, VideoContainer};
pub use career::{default_roster, AssetKind, Career, CareerId};
pub use state::{LoadToken, PlaybackState, TrackingState};
