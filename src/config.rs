// =============================================================================
// CONFIG.RS — Game settings read from a JSON file
//
// Every field has a default, so a config file only needs the keys it changes
// and a missing file is the same as `{}`.
// =============================================================================

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ── WindowConfig ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lifelight".into(),
            width: 1280,
            height: 720,
            resizable: false,
        }
    }
}

impl WindowConfig {
    /// `width / height`, or `0.0` for a zero height.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}

// ── GameConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    /// Simulation ticks per second.
    pub fps: u32,
    /// Side of one grid cell in pixels.
    pub tile_size: u32,
    /// Pixels the player moves per tick.
    pub player_speed: f32,
    /// Directory holding `*.lvl` files and `ts_defs/`, relative to the asset root.
    pub data_dir: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    /// Looping background music, relative to the asset root.
    pub music: Option<String>,
    /// Sound effects by name, relative to the asset root.
    pub sounds: BTreeMap<String, String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            fps: 60,
            tile_size: 48,
            player_speed: 4.0,
            data_dir: "data".into(),
            log_level: "info".into(),
            log_dir: None,
            music: None,
            sounds: BTreeMap::new(),
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Like [`GameConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn from_json(path: impl AsRef<Path>, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Fixed simulation step in seconds. A zero `fps` falls back to 60.
    pub fn fixed_dt(&self) -> f32 {
        let fps = if self.fps == 0 { 60 } else { self.fps };
        1.0 / fps as f32
    }
}
