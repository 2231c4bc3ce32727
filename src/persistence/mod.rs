//! Best-score persistence
//!
//! Backends:
//! - [`MemoryStore`]: in-process, used by tests and as a fallback
//! - [`JsonFileStore`]: `{"best_score": n}` on disk (native)
//! - [`LocalStorageStore`]: browser LocalStorage (wasm32)
//!
//! Storage is best-effort. [`BestScoreStore::get`] and
//! [`BestScoreStore::set`] swallow failures so a broken store never stalls
//! or crashes the frame loop.

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key shared by every backend
pub const BEST_SCORE_KEY: &str = "cosmic-defender-best";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed best score record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
    #[error("corrupt best score value {0:?}")]
    Corrupt(String),
}

/// On-disk / serialized best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub best_score: u64,
}

/// Where the best score lives between sessions
pub trait BestScoreStore {
    /// Read the stored best score; `Ok(0)` when nothing has been stored yet
    fn load(&self) -> Result<u64, StorageError>;

    fn store(&mut self, best_score: u64) -> Result<(), StorageError>;

    /// Best score, or 0 if the store is absent or unreadable
    fn get(&self) -> u64 {
        match self.load() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not read best score, starting from 0: {}", e);
                0
            }
        }
    }

    /// Write the best score; failures are logged and dropped
    fn set(&mut self, best_score: u64) {
        match self.store(best_score) {
            Ok(()) => log::debug!("Best score {} saved", best_score),
            Err(e) => log::warn!("Could not save best score {}: {}", best_score, e),
        }
    }
}

/// Volatile store; optionally fails every call
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    writes: usize,
    broken: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best_score: u64) -> Self {
        Self {
            value: Some(best_score),
            ..Self::default()
        }
    }

    /// Store whose reads and writes always fail
    pub fn unavailable() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Last successfully written value
    pub fn value(&self) -> Option<u64> {
        self.value
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StorageError> {
        if self.broken {
            return Err(StorageError::Unavailable);
        }
        Ok(self.value.unwrap_or(0))
    }

    fn store(&mut self, best_score: u64) -> Result<(), StorageError> {
        if self.broken {
            return Err(StorageError::Unavailable);
        }
        self.value = Some(best_score);
        self.writes += 1;
        Ok(())
    }
}

/// Parse a raw stored value: JSON record or bare integer
pub fn parse_best_score(raw: &str) -> Result<u64, StorageError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(n);
    }
    if raw.starts_with('{') {
        let record: BestScoreRecord = serde_json::from_str(raw)?;
        return Ok(record.best_score);
    }
    Err(StorageError::Corrupt(raw.to_string()))
}
