//! Error types raised by host collaborators.

use thiserror::Error;

/// A rendering/tracking engine call failed.
///
/// Never fatal: callers log it and treat the operation as a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineFault {
    /// The engine refused an operation (e.g. autoplay policy on `play`).
    #[error("{operation} refused: {reason}")]
    Refused {
        operation: &'static str,
        reason: String,
    },

    /// A handle passed to the engine is not (or no longer) known to it.
    #[error("{operation} on unknown handle {handle}")]
    UnknownHandle { operation: &'static str, handle: u64 },

    /// The engine is not running.
    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

impl EngineFault {
    /// Create a refused error.
    pub fn refused(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Refused {
            operation,
            reason: reason.into(),
        }
    }

    /// Create an unknown handle error.
    pub fn unknown_handle(operation: &'static str, handle: u64) -> Self {
        Self::UnknownHandle { operation, handle }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Session start failure. The only fatal, user-visible error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// Camera access was refused by the visitor or the platform.
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// Tracking could not be started for another reason.
    #[error("tracking failed to start: {0}")]
    Engine(#[from] EngineFault),
}

impl StartError {
    /// Create a permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Message shown to the visitor.
    pub fn user_message(&self) -> &'static str {
        match self {
            StartError::PermissionDenied(_) => {
                "Camera access is required. Please allow camera access and reload the kiosk."
            }
            StartError::Engine(_) => "The AR view could not be started. Please ask a staff member.",
        }
    }
}

/// Result type for engine calls.
pub type EngineResult<T> = Result<T, EngineFault>;
