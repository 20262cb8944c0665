//! Content orchestration state machine.
//!
//! The [`Orchestrator`] is the single owner of session state. Tracking
//! callbacks, load completions and navigation all arrive as [`Event`]s on
//! one queue and are handled in order.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator
//!     ├── AssetCache            career -> model/video, preloaded once
//!     ├── ContentBinder         at most one AnchorContent on the anchor
//!     ├── PlaybackSynchronizer  video + timeline start/freeze/resume
//!     ├── TrackingStateMachine  found/lost choreography
//!     ├── OrchestratorSession   careers, autoplay gate, scan UI, load token
//!     └── TimerSet              settle start, scan fade
//! ```
//!
//! # Example
//!
//! ```ignore
//! use arkiosk_core::orchestrator::Orchestrator;
//!
//! let mut kiosk = Orchestrator::new(stage, overlay, cache, &settings);
//! kiosk.preload(&fetcher, |pct| println!("{pct}%")).await;
//! kiosk.init_and_start()?;
//!
//! kiosk.select_career("Cloud");
//! loop {
//!     kiosk.advance(frame_delta);
//! }
//! ```

mod events;
mod kiosk;
mod session;

pub use events::{Event, EventQueue, EventSender, Navigation};
pub use kiosk::Orchestrator;
pub use session::{OrchestratorSession, SessionSummary};
