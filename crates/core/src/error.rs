//! Error types for the simulation core.
//!
//! Blocked moves and rotations are not errors; they come back as `false`.
//! Game over is a state, not an error either. What remains are programming errors
//! (`GridError`), persistence failures (`StoreError`) and bad tuning (`ConfigError`).

use std::path::PathBuf;

use thiserror::Error;

/// Why a piece could not be committed to the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("cell ({x}, {y}) is already occupied")]
    Overlap { x: i8, y: i8 },
    #[error("cell ({x}, {y}) is above the visible field")]
    AboveField { x: i8, y: i8 },
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i8, y: i8 },
}

/// Internal invariant violations. These are bugs, never normal game flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid invariant violated: {0}")]
    Invariant(String),
}

impl From<LockError> for GridError {
    fn from(err: LockError) -> Self {
        GridError::Invariant(err.to_string())
    }
}

/// Best-score persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("best score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("best score file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("best score store unavailable: {0}")]
    Unavailable(String),
}

/// Invalid configuration or tuning values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("line score table must be strictly increasing: {0:?}")]
    LineScoresNotIncreasing([u32; 5]),
    #[error("gravity curve must be non-increasing and non-zero: {0:?}")]
    GravityCurve(Vec<u32>),
    #[error("lines_per_level must be at least 1")]
    ZeroLinesPerLevel,
    #[error("initial level must be at least 1")]
    ZeroLevel,
    #[error("environment variable {name}={value:?} is invalid")]
    Env { name: &'static str, value: String },
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
