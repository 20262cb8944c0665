//! Marker tracking state, scan guidance and the autoplay gate.

pub mod gate;
mod machine;
mod scan;

pub use gate::AutoplayGate;
pub use machine::{FoundDecision, TrackingStateMachine};
pub use scan::ScanGuidance;
