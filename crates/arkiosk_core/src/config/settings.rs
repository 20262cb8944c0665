//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::{default_roster, Career};

/// Delay between marker lock-on and playback start.
///
/// Chosen empirically on the kiosk hardware; overridable in `[timing]`.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 800;

/// Duration of the scan-guidance fade-out.
pub const DEFAULT_SCAN_FADE_MS: u64 = 300;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Asset origin settings.
    #[serde(default)]
    pub assets: AssetSettings,

    /// Playback timing.
    #[serde(default)]
    pub timing: TimingSettings,

    /// Anchor layout.
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Career roster.
    #[serde(default = "default_roster")]
    pub careers: Vec<Career>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets: AssetSettings::default(),
            timing: TimingSettings::default(),
            layout: LayoutSettings::default(),
            logging: LoggingSettings::default(),
            careers: default_roster(),
        }
    }
}

/// Where asset files are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOrigin {
    /// Local directory.
    Directory(PathBuf),
    /// Static-file HTTP origin (base URL).
    Http(String),
}

/// Asset origin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSettings {
    /// Directory path or `http(s)://` base URL.
    #[serde(default = "default_asset_source")]
    pub source: String,

    /// Per-request timeout for HTTP origins, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_asset_source() -> String {
    "assets".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl AssetSettings {
    /// Interpret `source` as a directory or an HTTP base URL.
    pub fn origin(&self) -> AssetOrigin {
        let source = self.source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            AssetOrigin::Http(source.to_string())
        } else {
            AssetOrigin::Directory(PathBuf::from(source))
        }
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            source: default_asset_source(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Playback timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Delay between marker lock-on and playback start (ms).
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Scan-guidance fade-out duration (ms).
    #[serde(default = "default_scan_fade")]
    pub scan_fade_ms: u64,
}

fn default_settle_delay() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

fn default_scan_fade() -> u64 {
    DEFAULT_SCAN_FADE_MS
}

impl TimingSettings {
    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Scan fade as a duration.
    pub fn scan_fade(&self) -> Duration {
        Duration::from_millis(self.scan_fade_ms)
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            scan_fade_ms: default_scan_fade(),
        }
    }
}

/// Anchor layout configuration (anchor units, marker width = 1.0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Width of the video surface.
    #[serde(default = "default_video_width")]
    pub video_width: f64,

    /// Gap between the video surface's top edge and the model's lowest point.
    #[serde(default = "default_model_nudge")]
    pub model_nudge: f64,

    /// Facing smoothing rate (1/s); higher turns toward the camera faster.
    #[serde(default = "default_facing_rate")]
    pub facing_rate: f64,
}

fn default_video_width() -> f64 {
    1.0
}

fn default_model_nudge() -> f64 {
    0.02
}

fn default_facing_rate() -> f64 {
    6.0
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            video_width: default_video_width(),
            model_nudge: default_model_nudge(),
            facing_rate: default_facing_rate(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: LogLevel,

    /// Also write daily-rolling log files.
    #[serde(default = "default_true")]
    pub file_logging: bool,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_true() -> bool {
    true
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            file_logging: true,
            logs_folder: default_logs_folder(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Assets,
    Timing,
    Layout,
    Logging,
    Careers,
}

impl ConfigSection {
    /// All sections in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Assets,
        ConfigSection::Timing,
        ConfigSection::Layout,
        ConfigSection::Logging,
        ConfigSection::Careers,
    ];

    /// Get the TOML key for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Assets => "assets",
            ConfigSection::Timing => "timing",
            ConfigSection::Layout => "layout",
            ConfigSection::Logging => "logging",
            ConfigSection::Careers => "careers",
        }
    }

    /// Comment written above the section.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Assets => "Asset origin (directory or http(s) base URL)",
            ConfigSection::Timing => "Playback timing",
            ConfigSection::Layout => "Anchor layout",
            ConfigSection::Logging => "Logging configuration",
            ConfigSection::Careers => "Career roster; candidates are tried in order",
        }
    }
}
