use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// File-backed slot storage. Each named slot holds one string payload at
/// `<base_dir>/<slot>.json`, replaced wholesale on every write.
pub struct CoreLocalStorage {
    base_dir: PathBuf,
    // Serializes slot access within this process. External writers to the
    // same directory still race; last write wins.
    lock: Mutex<()>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

impl CoreLocalStorage {
    pub fn new(base_dir: &str) -> Result<Self, StorageError> {
        let base_dir = PathBuf::from(base_dir);
        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
        }

        Ok(CoreLocalStorage {
            base_dir,
            lock: Mutex::new(()),
        })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", slot))
    }

    /// Reads a slot's payload; `None` when the slot was never written.
    pub fn read_slot(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;

        match fs::read_to_string(self.slot_path(slot)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Replaces a slot's payload in a single write.
    pub fn write_slot(&self, slot: &str, contents: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;

        fs::write(self.slot_path(slot), contents)?;
        Ok(())
    }
}
