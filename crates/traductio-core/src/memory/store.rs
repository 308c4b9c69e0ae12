use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use super::entry::TranslationMemoryEntry;
use super::storage::StorageBackend;
use crate::error::{Error, Result};

/// Key under which the whole collection is stored
pub const STORAGE_KEY: &str = "traductio_tm_db";

const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Published after every successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryUpdated {
    pub count: usize,
}

/// Persists the full entry collection as one JSON array.
///
/// There is no incremental persistence: every save rewrites the collection.
pub struct EntryStore {
    backend: Box<dyn StorageBackend>,
    updates: broadcast::Sender<MemoryUpdated>,
}

impl EntryStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            backend: Box::new(backend),
            updates,
        }
    }

    /// Read the persisted collection.
    ///
    /// A missing key is an empty collection. A payload that does not decode
    /// is reported as [`Error::StoreCorrupt`].
    pub fn load(&self) -> Result<Vec<TranslationMemoryEntry>> {
        let Some(bytes) = self.backend.get(STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        let entries: Vec<TranslationMemoryEntry> =
            serde_json::from_slice(&bytes).map_err(|e| Error::StoreCorrupt(e.to_string()))?;

        debug!("Loaded {} translation memory entries", entries.len());
        Ok(entries)
    }

    /// Replace the persisted collection and notify subscribers.
    pub fn save(&self, entries: &[TranslationMemoryEntry]) -> Result<()> {
        let bytes = serde_json::to_vec(entries).map_err(|e| Error::StoreWrite(e.to_string()))?;
        self.backend.insert(STORAGE_KEY, &bytes)?;

        // No subscribers is not an error
        let _ = self.updates.send(MemoryUpdated {
            count: entries.len(),
        });
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MemoryUpdated> {
        self.updates.subscribe()
    }
}
