//! AR Kiosk Core - content orchestration for a marker-based AR career kiosk
//!
//! This crate contains the state machine that decides what content is bound
//! to the tracked anchor and whether it plays. It has zero UI or engine
//! dependencies: the rendering/tracking engine and the overlay shell are
//! reached through the traits in [`host`].

pub mod assets;
pub mod binder;
pub mod config;
pub mod facing;
pub mod host;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod playback;
pub mod timers;
pub mod tracking;

#[cfg(test)]
pub(crate) mod testing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
