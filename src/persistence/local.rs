//! Browser LocalStorage backend (wasm32)

use web_sys::Storage;

use super::{BEST_SCORE_KEY, BestScoreStore, StorageError, parse_best_score};

/// Best score stored as a decimal string under [`BEST_SCORE_KEY`]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

impl BestScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64, StorageError> {
        let storage = Self::storage()?;
        match storage.get_item(BEST_SCORE_KEY) {
            Ok(Some(raw)) => parse_best_score(&raw),
            Ok(None) => Ok(0),
            Err(_) => Err(StorageError::Unavailable),
        }
    }

    fn store(&mut self, best_score: u64) -> Result<(), StorageError> {
        let storage = Self::storage()?;
        storage
            .set_item(BEST_SCORE_KEY, &best_score.to_string())
            .map_err(|_| StorageError::Unavailable)
    }
}
