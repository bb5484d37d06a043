//! File-backed store.
//!
//! All keys live in one JSON object on disk. Writes go to a sibling temp
//! file which is then renamed over the original, so a crash mid-write leaves
//! the previous snapshot intact. The in-memory map only changes once the
//! write has reached the disk, so a failed write leaves both untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use parking_lot::ReentrantMutex;
use tracing::{info, warn};

use super::{KeyValueStore, StoreError, StoreLock};

/// A store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    writer: ReentrantMutex<()>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file
    /// is logged and also starts empty; it is overwritten on the next write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the parent directory cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Corrupt store file, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable store file, starting empty");
                BTreeMap::new()
            }
        };

        info!(path = %path.display(), keys = entries.len(), "Opened store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            writer: ReentrantMutex::new(()),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn lock(&self) -> StoreLock<'_> {
        self.writer.lock()
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = entries.clone();
        next.insert(key.to_owned(), value);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}
