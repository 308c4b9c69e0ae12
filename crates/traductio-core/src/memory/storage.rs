use sled::Db;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

use crate::error::{Error, Result};

/// Byte storage addressed by a fixed key.
///
/// The translation memory writes its whole collection under one key, so a
/// backend only needs whole-value reads and writes.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn insert(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Process-local storage; nothing touches the disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self
            .values
            .read()
            .map_err(|e| Error::StoreRead(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn insert(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| Error::StoreWrite(e.to_string()))?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Disk-backed storage using sled
#[derive(Clone)]
pub struct DiskStorage {
    db: Db,
}

impl DiskStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::StoreInit(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let db = sled::open(path).map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("WouldBlock") || err_str.contains("lock") {
                Error::StoreInit(format!(
                    "Translation memory locked at {}\n\n\
                    Another traductio process is using it, or a previous instance crashed.\n\
                    To fix: stop the other process or rm {}/db/LOCK",
                    path.display(),
                    path.display()
                ))
            } else {
                Error::StoreInit(format!(
                    "Failed to open translation memory at {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        debug!("Opened translation memory at {}", path.display());

        Ok(Self { db })
    }

    /// Storage that lives only as long as this value.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| Error::StoreInit(format!("Failed to open temporary storage: {e}")))?;
        Ok(Self { db })
    }
}

impl StorageBackend for DiskStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.db
            .get(key.as_bytes())
            .map(|value| value.map(|v| v.to_vec()))
            .map_err(|e| Error::StoreRead(e.to_string()))
    }

    fn insert(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| Error::StoreWrite(e.to_string()))?;

        // Durable before returning
        self.db
            .flush()
            .map_err(|e| Error::StoreWrite(format!("Flush failed: {e}")))?;

        Ok(())
    }
}
