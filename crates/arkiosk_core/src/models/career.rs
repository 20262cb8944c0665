//! Career roster types.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical identifier of a career content set (e.g. `"Cloud"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CareerId(String);

impl CareerId {
    /// Create a new career identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CareerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CareerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CareerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for CareerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Kind of downloadable asset attached to a career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Model,
    Video,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Model => write!(f, "model"),
            AssetKind::Video => write!(f, "video"),
        }
    }
}

/// One selectable themed content set in the kiosk menu.
///
/// Candidate filenames are tried in declared order; the first one that
/// fetches and decodes wins. Several spellings of the same file are common
/// because the content is authored by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    /// Career identifier.
    pub id: CareerId,

    /// Label shown on the menu button.
    #[serde(default)]
    pub label: String,

    /// Ordered model filename candidates, relative to the asset origin.
    #[serde(default)]
    pub model_candidates: Vec<String>,

    /// Ordered video filename candidates, relative to the asset origin.
    #[serde(default)]
    pub video_candidates: Vec<String>,
}

impl Career {
    /// Create a career with no candidates.
    pub fn new(id: impl Into<CareerId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            model_candidates: Vec::new(),
            video_candidates: Vec::new(),
        }
    }

    /// Set model candidates (builder pattern).
    pub fn with_model_candidates<I, T>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.model_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Set video candidates (builder pattern).
    pub fn with_video_candidates<I, T>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.video_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Candidate filenames for the given asset kind.
    pub fn candidates(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Model => &self.model_candidates,
            AssetKind::Video => &self.video_candidates,
        }
    }

    /// Label, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            self.id.as_str()
        } else {
            &self.label
        }
    }
}

/// Built-in roster used when the config has no `[[careers]]` entries.
pub fn default_roster() -> Vec<Career> {
    [
        ("Cloud", "Cloud Engineer", "cloud"),
        ("Network", "Network Engineer", "network"),
        ("Security", "Security Analyst", "security"),
        ("Software", "Software Developer", "software"),
        ("Data", "Data Scientist", "data"),
    ]
    .into_iter()
    .map(|(id, label, stem)| {
        let title = capitalize(stem);
        Career::new(id, label)
            .with_model_candidates([
                format!("models/{stem}.glb"),
                format!("models/{title}.glb"),
                format!("models/{stem}.gltf"),
            ])
            .with_video_candidates([
                format!("videos/{stem}.mp4"),
                format!("videos/{title}.mp4"),
                format!("videos/{stem}.webm"),
            ])
    })
    .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
