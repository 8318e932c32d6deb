//! High-score persistence.
//!
//! The record is a single JSON object, `{"highscore": N}`.  A missing or
//! damaged record reads as zero and is never reported to the player.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_FILE_NAME: &str = ".car_dodge_score.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("high score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encoding high score record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the best score lives between sessions.
pub trait ScoreStore {
    /// Stored high score, or 0 when there is none or it cannot be read.
    fn load_high_score(&self) -> u32;

    /// Overwrite the stored high score.
    fn save_high_score(&mut self, value: u32) -> Result<(), PersistError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    highscore: u32,
}

/// `ScoreStore` backed by a JSON file.
#[derive(Clone, Debug)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.car_dodge_score.json`, or the working directory when there is no
    /// home directory.
    pub fn default_path() -> PathBuf {
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonScoreStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl ScoreStore for JsonScoreStore {
    fn load_high_score(&self) -> u32 {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No high score record at {}", self.path.display());
                return 0;
            }
            Err(e) => {
                log::warn!("Cannot read {}: {e}", self.path.display());
                return 0;
            }
        };

        match serde_json::from_str::<HighScoreRecord>(&text) {
            Ok(record) => {
                log::info!("Loaded high score {}", record.highscore);
                record.highscore
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score record {}: {e}", self.path.display());
                0
            }
        }
    }

    fn save_high_score(&mut self, value: u32) -> Result<(), PersistError> {
        let io_err = |source| PersistError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string(&HighScoreRecord { highscore: value })?;
        fs::write(&self.path, json).map_err(io_err)?;

        log::info!("High score {value} saved to {}", self.path.display());
        Ok(())
    }
}
