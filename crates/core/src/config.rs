//! Game configuration
//!
//! Built from defaults, an optional JSON file and environment variables:
//!
//! - `TETRIS_CONFIG`: path of a JSON file with any subset of [`GameConfig`] fields
//! - `TETRIS_SEED`: piece generator seed (u32)
//! - `TETRIS_VOLUME`: audio volume, clamped to 0.0..=1.0
//! - `TETRIS_START_LEVEL`: initial level (>= 1)
//! - `TETRIS_BEST_SCORE_PATH`: where the best score is persisted
//!
//! Environment variables win over the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scoring::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Passed through to the audio collaborator; the simulation never reads it.
    pub volume: f32,
    /// Fixed generator seed; `None` seeds from the clock.
    pub seed: Option<u32>,
    /// Best score file; `None` uses the platform config directory.
    pub best_score_path: Option<PathBuf>,
    pub tuning: Tuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            seed: None,
            best_score_path: None,
            tuning: Tuning::default(),
        }
    }
}

impl GameConfig {
    /// Defaults, then `TETRIS_CONFIG`, then the individual variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var("TETRIS_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };

        if let Some(seed) = parse_env::<u32>("TETRIS_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(volume) = parse_env::<f32>("TETRIS_VOLUME")? {
            config.volume = volume;
        }
        if let Some(level) = parse_env::<u32>("TETRIS_START_LEVEL")? {
            config.tuning.initial_level = level;
        }
        if let Ok(path) = env::var("TETRIS_BEST_SCORE_PATH") {
            let path = path.trim();
            if !path.is_empty() {
                config.best_score_path = Some(PathBuf::from(path));
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()
    }

    /// Volume clamped to 0.0..=1.0 (NaN counts as silent)
    pub fn volume(&self) -> f32 {
        if self.volume.is_nan() {
            0.0
        } else {
            self.volume.clamp(0.0, 1.0)
        }
    }

    /// Configured seed, or one derived from the wall clock.
    pub fn seed_or_clock(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
                .unwrap_or(1)
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<T>()
                .map(Some)
                .map_err(|_| ConfigError::Env { name, value })
        }
        Err(_) => Ok(None),
    }
}
