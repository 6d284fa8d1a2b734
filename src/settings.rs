//! Game settings
//!
//! Read once at startup from an optional JSON file. Every field has a default,
//! so a file only needs the keys it changes.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::BoundaryPolicy;

/// Environment variable naming an explicit settings file
pub const CONFIG_ENV: &str = "SQUARE_DODGE_CONFIG";
/// Settings file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "square-dodge.json";
pub const DEFAULT_LOG_FILE: &str = "square-dodge.log";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Where [`Settings::load`] found its settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// File named by `$SQUARE_DODGE_CONFIG`
    Env(PathBuf),
    /// `square-dodge.json` in the working directory
    WorkingDir(PathBuf),
    Defaults,
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsSource::Env(path) => write!(f, "{} (from {CONFIG_ENV})", path.display()),
            SettingsSource::WorkingDir(path) => write!(f, "{}", path.display()),
            SettingsSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play field width in world units
    pub screen_width: f32,
    pub screen_height: f32,
    /// What happens when the player reaches a side edge
    pub boundary: BoundaryPolicy,
    /// Fixed RNG seed; a fresh one is drawn each run when unset
    pub seed: Option<u64>,
    /// Frame rate cap, 0 runs unpaced
    pub target_fps: u32,
    /// On terminals that never report releases: how long a key stays held
    /// after its first press, covering the OS delay before repeats start
    pub key_repeat_delay_ms: u64,
    /// On terminals that never report releases: how long a key stays held
    /// after each repeat
    pub key_hold_ms: u64,
    /// Log destination; logging is off when unset
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            boundary: BoundaryPolicy::Clamp,
            seed: None,
            target_fps: 60,
            key_repeat_delay_ms: 600,
            key_hold_ms: 200,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl Settings {
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }

    pub fn key_repeat_delay(&self) -> Duration {
        Duration::from_millis(self.key_repeat_delay_ms)
    }

    /// Time budget of one frame, `None` when unpaced
    pub fn frame_budget(&self) -> Option<Duration> {
        (self.target_fps > 0).then(|| Duration::from_secs_f64(1.0 / self.target_fps as f64))
    }

    /// The configured seed, or a random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random::<u64>)
    }

    /// Reject play fields the entities cannot fit in and zero hold windows
    pub fn validate(&self) -> Result<(), SettingsError> {
        let widest = PLAYER_SIZE.max(ENEMY_SIZE);
        if self.screen_width.is_nan() || self.screen_width < widest {
            return Err(SettingsError::Invalid(format!(
                "screen_width {} is narrower than an entity ({widest})",
                self.screen_width
            )));
        }
        if self.screen_height.is_nan() || self.screen_height <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "screen_height {} must be positive",
                self.screen_height
            )));
        }
        // A zero window releases a key in the same poll that pressed it
        if self.key_hold_ms == 0 || self.key_repeat_delay_ms == 0 {
            return Err(SettingsError::Invalid(
                "key_hold_ms and key_repeat_delay_ms must be positive".to_string(),
            ));
        }
        if self.key_repeat_delay_ms < self.key_hold_ms {
            return Err(SettingsError::Invalid(format!(
                "key_repeat_delay_ms {} is shorter than key_hold_ms {}",
                self.key_repeat_delay_ms, self.key_hold_ms
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `$SQUARE_DODGE_CONFIG`, then `square-dodge.json`, then defaults
    ///
    /// Runs before logging is set up, so the caller logs the returned source.
    pub fn load() -> Result<(Self, SettingsSource), SettingsError> {
        Self::load_with(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            Path::new(DEFAULT_CONFIG_FILE),
        )
    }

    /// Resolve settings from an explicit path or a fallback file
    ///
    /// An explicit path must exist; the fallback file is optional.
    pub fn load_with(
        explicit: Option<PathBuf>,
        fallback: &Path,
    ) -> Result<(Self, SettingsSource), SettingsError> {
        if let Some(path) = explicit {
            let settings = Self::load_from(&path)?;
            return Ok((settings, SettingsSource::Env(path)));
        }

        if fallback.is_file() {
            let settings = Self::load_from(fallback)?;
            return Ok((settings, SettingsSource::WorkingDir(fallback.to_path_buf())));
        }

        Ok((Self::default(), SettingsSource::Defaults))
    }
}
