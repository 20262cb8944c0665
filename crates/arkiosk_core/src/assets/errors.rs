//! Error types for asset fetch and decode.

use thiserror::Error;

use crate::models::{AssetKind, CareerId};

/// Failure to fetch one candidate file from the asset origin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The origin has no such file.
    #[error("'{name}' not found")]
    NotFound { name: String },

    /// The origin answered with a non-success status.
    #[error("'{name}' returned HTTP {status}")]
    Status { name: String, status: u16 },

    /// Reading the file failed.
    #[error("reading '{name}' failed: {message}")]
    Io { name: String, message: String },

    /// The origin itself is unreachable; further fetches are pointless.
    #[error("asset origin unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a status error.
    pub fn status(name: impl Into<String>, status: u16) -> Self {
        Self::Status {
            name: name.into(),
            status,
        }
    }

    /// Create an I/O error.
    pub fn io(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Whether this failure should stop the whole preload batch.
    pub fn is_hard(&self) -> bool {
        matches!(self, FetchError::Unavailable(_))
    }
}

/// Asset-level failure, reported as a warning and never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Every candidate failed; the slot stays absent.
    #[error("no usable {kind} for career '{career}' (tried {})", tried.join(", "))]
    Unavailable {
        career: CareerId,
        kind: AssetKind,
        tried: Vec<String>,
    },

    /// Fetched bytes could not be parsed.
    #[error("'{file}' is not a valid {kind}: {message}")]
    Decode {
        file: String,
        kind: AssetKind,
        message: String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AssetError {
    /// Create an unavailable error.
    pub fn unavailable(career: CareerId, kind: AssetKind, tried: Vec<String>) -> Self {
        Self::Unavailable { career, kind, tried }
    }

    /// Create a decode error.
    pub fn decode(file: impl Into<String>, kind: AssetKind, message: impl Into<String>) -> Self {
        Self::Decode {
            file: file.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Result type for fetches.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
