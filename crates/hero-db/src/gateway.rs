//! Persistence gateway: one [`AppData`] snapshot in one versioned slot.
//!
//! The `try_*` methods report failures as [`StorageError`]. The plain
//! `save`/`load`/`clear` methods are the fail-soft surface the store uses:
//! they log and absorb every error, and `load` treats unreadable or
//! malformed data as "no data".

use std::io;

use thiserror::Error;

use crate::models::AppData;
use crate::slot::SlotBackend;

/// Key of the durable slot. Bump the suffix when the snapshot format changes
/// incompatibly so old data is never parsed as the new format.
pub const STORAGE_KEY: &str = "holiday_hero_data_v1";

/// Errors raised by the gateway's fallible operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes the snapshot through a [`SlotBackend`].
pub struct PersistenceGateway {
    backend: Box<dyn SlotBackend>,
    key: &'static str,
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PersistenceGateway {
    /// Gateway over `backend` using [`STORAGE_KEY`].
    pub fn new(backend: impl SlotBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            key: STORAGE_KEY,
        }
    }

    pub fn key(&self) -> &str {
        self.key
    }

    /// Serialize `snapshot` and write it to the slot.
    pub fn try_save(&self, snapshot: &AppData) -> Result<(), StorageError> {
        let text = serde_json::to_string(snapshot)?;
        self.backend.write(self.key, &text)?;
        Ok(())
    }

    /// Read and parse the slot. `Ok(None)` when the slot is empty.
    pub fn try_load(&self) -> Result<Option<AppData>, StorageError> {
        match self.backend.read(self.key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Remove the slot.
    pub fn try_clear(&self) -> Result<(), StorageError> {
        self.backend.remove(self.key)?;
        Ok(())
    }

    /// Best-effort save. Failures are logged, never returned.
    pub fn save(&self, snapshot: &AppData) {
        match self.try_save(snapshot) {
            Ok(()) => tracing::debug!(key = %self.key, "snapshot saved"),
            Err(e) => tracing::error!(key = %self.key, error = %e, "failed to save snapshot"),
        }
    }

    /// Load the snapshot, treating any failure as absent.
    pub fn load(&self) -> Option<AppData> {
        match self.try_load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring unreadable snapshot");
                None
            }
        }
    }

    /// Best-effort clear. Failures are logged, never returned.
    pub fn clear(&self) {
        if let Err(e) = self.try_clear() {
            tracing::error!(key = %self.key, error = %e, "failed to clear snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::MemorySlot;

    #[test]
    fn load_from_empty_slot_is_none() {
        let gw = PersistenceGateway::new(MemorySlot::new());
        assert!(gw.try_load().unwrap().is_none());
        assert!(gw.load().is_none());
    }

    #[test]
    fn malformed_text_is_an_error_for_try_load_and_absent_for_load() {
        let slot = MemorySlot::new();
        slot.write(STORAGE_KEY, "{ not json").unwrap();
        let gw = PersistenceGateway::new(slot);
        assert!(matches!(gw.try_load(), Err(StorageError::Json(_))));
        assert!(gw.load().is_none());
    }

    #[test]
    fn clear_on_empty_slot_succeeds() {
        let gw = PersistenceGateway::new(MemorySlot::new());
        gw.try_clear().unwrap();
        gw.clear();
    }

    #[test]
    fn default_key_is_versioned() {
        let gw = PersistenceGateway::new(MemorySlot::new());
        assert_eq!(gw.key(), "holiday_hero_data_v1");
        assert!(gw.key().ends_with("_v1"));
    }
}
