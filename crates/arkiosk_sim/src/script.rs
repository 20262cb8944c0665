//! Scripted kiosk sessions.
//!
//! A script is a JSON document listing what the visitor and the tracking
//! engine do, and when:
//!
//! ```json
//! {
//!   "duration_ms": 6000,
//!   "steps": [
//!     { "at_ms": 0,    "event": "select_career", "career": "Cloud" },
//!     { "at_ms": 500,  "event": "found" },
//!     { "at_ms": 4000, "event": "lost" }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use arkiosk_core::host::{Overlay, Stage};
use arkiosk_core::orchestrator::Orchestrator;

/// One thing that happens during a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Action {
    Found,
    Lost,
    SelectCareer { career: String },
    PauseToMenu,
    ReturnToLast,
    RemoveAndShowMenu,
    ResetToIdle,
    Autoplay { enabled: bool },
    ScanUiSuppressed { suppressed: bool },
}

impl Action {
    /// Feed this action into the orchestrator.
    ///
    /// Tracking callbacks go through the event queue like a real engine
    /// would post them; navigation goes through the public actions.
    pub fn apply<S: Stage, O: Overlay>(&self, kiosk: &mut Orchestrator<S, O>) {
        match self {
            Action::Found => {
                kiosk.event_sender().target_found();
            }
            Action::Lost => {
                kiosk.event_sender().target_lost();
            }
            Action::SelectCareer { career } => kiosk.select_career(career.as_str()),
            Action::PauseToMenu => kiosk.pause_to_menu(),
            Action::ReturnToLast => kiosk.return_to_last(),
            Action::RemoveAndShowMenu => kiosk.remove_and_show_menu(),
            Action::ResetToIdle => kiosk.reset_to_idle(),
            Action::Autoplay { enabled } => kiosk.set_autoplay_enabled(*enabled),
            Action::ScanUiSuppressed { suppressed } => kiosk.set_scan_ui_suppressed(*suppressed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Step {
    /// Offset from session start.
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

impl Step {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    pub duration_ms: u64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Read and validate a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in script {}", path.display()))
    }

    /// Parse a script, ordering steps by time.
    ///
    /// Steps sharing a timestamp keep their written order.
    pub fn parse(content: &str) -> Result<Self> {
        let mut script: Script = serde_json::from_str(content)?;
        script.steps.sort_by_key(|step| step.at_ms);

        if let Some(late) = script.steps.iter().find(|s| s.at_ms > script.duration_ms) {
            bail!(
                "step at {} ms is past the session end ({} ms)",
                late.at_ms,
                script.duration_ms
            );
        }
        Ok(script)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
