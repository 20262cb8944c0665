//! Events funneled into the orchestrator and the queue that carries them.

use std::fmt;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use crate::host::LoadedContent;
use crate::models::{CareerId, LoadToken};

/// Visitor navigation actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    SelectCareer(CareerId),
    PauseToMenu,
    ReturnToLast,
    RemoveAndShowMenu,
    ResetToIdle,
    SetAutoplay(bool),
    SetScanUiSuppressed(bool),
}

/// Everything the orchestrator reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Tracking engine locked on to the marker.
    TargetFound,
    /// Tracking engine lost the marker.
    TargetLost,
    /// Stage finished instantiating requested content.
    ContentLoaded(LoadedContent),
    /// Stage could not instantiate requested content.
    ContentFailed {
        token: LoadToken,
        career: CareerId,
        reason: String,
    },
    /// A bound video's intrinsic size became known.
    VideoMetadata {
        token: LoadToken,
        width: u32,
        height: u32,
    },
    Navigation(Navigation),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::TargetFound => write!(f, "target-found"),
            Event::TargetLost => write!(f, "target-lost"),
            Event::ContentLoaded(loaded) => {
                write!(f, "content-loaded {} {}", loaded.career, loaded.token)
            }
            Event::ContentFailed { token, career, .. } => {
                write!(f, "content-failed {} {}", career, token)
            }
            Event::VideoMetadata {
                token,
                width,
                height,
            } => write!(f, "video-metadata {} {}x{}", token, width, height),
            Event::Navigation(nav) => write!(f, "navigation {:?}", nav),
        }
    }
}

/// Cloneable handle collaborators use to post events.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<Event>,
}

impl EventSender {
    /// Post an event. Returns `false` if the orchestrator is gone.
    pub fn send(&self, event: Event) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping {}: orchestrator shut down", e.0);
                false
            }
        }
    }

    pub fn target_found(&self) -> bool {
        self.send(Event::TargetFound)
    }

    pub fn target_lost(&self) -> bool {
        self.send(Event::TargetLost)
    }

    pub fn content_loaded(&self, loaded: LoadedContent) -> bool {
        self.send(Event::ContentLoaded(loaded))
    }

    pub fn content_failed(
        &self,
        token: LoadToken,
        career: CareerId,
        reason: impl Into<String>,
    ) -> bool {
        self.send(Event::ContentFailed {
            token,
            career,
            reason: reason.into(),
        })
    }

    pub fn video_metadata(&self, token: LoadToken, width: u32, height: u32) -> bool {
        self.send(Event::VideoMetadata {
            token,
            width,
            height,
        })
    }
}

/// Single-consumer FIFO drained by the orchestrator.
#[derive(Debug)]
pub struct EventQueue {
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    pub fn push(&self, event: Event) {
        // The queue owns a receiver, so the channel cannot be closed here
        let _ = self.tx.send(event);
    }

    /// Next event in arrival order, without waiting.
    pub fn pop(&mut self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
