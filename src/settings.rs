//! Game settings and preferences.
//!
//! Read from an optional JSON file; every field has a default, so a partial
//! file (or none at all) is fine.  Command-line flags are layered on top by
//! the binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::Ruleset;

pub const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("reading settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ruleset preselected on the start screen.
    pub ruleset: Ruleset,
    /// Ticks per second.
    pub fps: u32,
    /// Ring the terminal bell on crashes and shield pickups.
    pub sound: bool,
    /// Override for the high score record location.
    pub high_score_file: Option<PathBuf>,
    /// Log file; `None` disables logging.
    pub log_file: Option<PathBuf>,
    /// One of off, error, warn, info, debug, trace.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::default(),
            fps: DEFAULT_FPS,
            sound: true,
            high_score_file: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// `<config dir>/car_dodge/settings.json`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("car_dodge").join("settings.json"))
    }

    /// Load settings from `path`.  A missing file yields the defaults; a
    /// file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Duration of one tick.  A zero rate falls back to the default.
    pub fn frame_duration(&self) -> Duration {
        let fps = if self.fps == 0 { DEFAULT_FPS } else { self.fps };
        Duration::from_secs(1) / fps
    }

    /// Parsed log level; unknown names fall back to `Info`.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
