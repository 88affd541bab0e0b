//! Swipe surface configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file at
//! all) yields the stock behavior: 10 unit click radius, unlocked, sentinel
//! positions for keyboard and gamepad gestures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::input::Surface;

/// Distance at or below which a pointer press counts as a click
pub const CLICK_DIST_THRESHOLD: f64 = 10.0;

/// Position reported for keyboard and gamepad gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPositionMode {
    /// Always the unknown-position sentinel
    #[default]
    Unknown,
    /// Midpoint of the surface edge the direction points at
    SurfaceEdges,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    /// Button poll cadence while a device is connected
    pub poll_interval_ms: u64,
    /// How often to look for connected devices
    pub presence_interval_ms: u64,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 66, // ~15Hz
            presence_interval_ms: 3000,
        }
    }
}

impl GamepadConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn presence_interval(&self) -> Duration {
        Duration::from_millis(self.presence_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Pointer travel above which a press becomes a swipe
    pub click_distance_threshold: f64,
    /// Initial lock state
    pub locked_screen: bool,
    /// Key names that produce a click
    pub activate_keys: Vec<String>,
    pub key_positions: KeyPositionMode,
    /// Region accepting pointer presses; unbounded when absent
    pub surface: Option<Surface>,
    pub gamepad: GamepadConfig,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            click_distance_threshold: CLICK_DIST_THRESHOLD,
            locked_screen: false,
            activate_keys: vec![" ".into(), "Space".into(), "Enter".into()],
            key_positions: KeyPositionMode::default(),
            surface: None,
            gamepad: GamepadConfig::default(),
        }
    }
}

impl SwipeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from an explicit path; a missing or invalid file is an error
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded swipe config from {:?}", path);
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/swipe-gesture/config.toml`, else under `~/.config`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok()
            .map(|dir| dir.join("swipe-gesture/config.toml"))
    }

    /// Load from the default path, or fall back to defaults
    pub fn load_default() -> Self {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring swipe config: {}", e),
                }
            }
        }
        tracing::info!("No swipe config found, using defaults");
        Self::default()
    }
}
