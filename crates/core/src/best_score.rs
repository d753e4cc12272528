//! Best-score persistence.
//!
//! The grid reads the best score once at construction and hands back pending writes;
//! the owner decides when to call [`BestScoreStore::save`], so persistence never runs
//! inside a gravity tick.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

const APP_DIR: &str = "tetris-grid";
const FILE_NAME: &str = "best_score.json";

/// Read/write collaborator for the persisted best score
pub trait BestScoreStore: Send + Sync {
    fn load(&self) -> Result<u32, StoreError>;
    fn save(&self, best: u32) -> Result<(), StoreError>;
}

/// Load through `store`, logging failures and falling back to zero.
pub fn load_or_zero(store: &dyn BestScoreStore) -> u32 {
    match store.load() {
        Ok(best) => best,
        Err(err) => {
            tracing::warn!(error = %err, "best score unavailable, starting from 0");
            0
        }
    }
}

/// In-process store, used by tests and when persistence is disabled.
#[derive(Debug, Default)]
pub struct MemoryStore {
    best: AtomicU32,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new(best: u32) -> Self {
        Self {
            best: AtomicU32::new(best),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn value(&self) -> u32 {
        self.best.load(Ordering::SeqCst)
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.value())
    }

    fn save(&self, best: u32) -> Result<(), StoreError> {
        self.best.store(best, Ordering::SeqCst);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreFile {
    best_score: u32,
}

/// JSON file store: `{"best_score": N}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/tetris-grid/best_score.json`, or the working directory when the
    /// platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BestScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            // First run: nothing persisted yet.
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(self.io_err(err)),
        };
        let file: BestScoreFile =
            serde_json::from_str(&text).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(file.best_score)
    }

    fn save(&self, best: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        let text = serde_json::to_string(&BestScoreFile { best_score: best }).map_err(|source| {
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        // Write-then-rename so a crash never leaves a truncated file behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        tracing::debug!(best, path = %self.path.display(), "best score saved");
        Ok(())
    }
}
