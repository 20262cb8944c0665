//! Configuration management for the kiosk.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Automatic defaults for missing keys
//!
//! # Example
//!
//! ```no_run
//! use arkiosk_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/arkiosk.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Assets from: {}", config.settings().assets.source);
//!
//! config.settings_mut().timing.settle_delay_ms = 1000;
//! config.update_section(ConfigSection::Timing).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AssetOrigin, AssetSettings, ConfigSection, LayoutSettings, LoggingSettings, Settings,
    TimingSettings, DEFAULT_SCAN_FADE_MS, DEFAULT_SETTLE_DELAY_MS,
};
