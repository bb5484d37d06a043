//! Key-value persistence for storefront state.
//!
//! Every store (auth, cart, catalog, quests) keeps its state as a JSON blob
//! under a named key, the same shape a browser's local storage would hold.
//! There is no schema version; a blob that fails to parse is logged and
//! treated as absent.
//!
//! # Keys
//!
//! - `users` - All registered users, passwords included
//! - `user` - The current session's user (no password)
//! - `cart` - Cart items
//! - `lastCheckedOutItems` - Snapshot of the cart at the last checkout
//! - `envirProductsCache` - Enriched product catalog
//! - `quests_{userId}` - Per-user quest list
//! - `lastQuestReset_{userId}` - Date of the last daily quest reset

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use parking_lot::ReentrantMutexGuard;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from the underlying store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A previous writer panicked while holding the lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Guard returned by [`KeyValueStore::lock`].
pub type StoreLock<'a> = ReentrantMutexGuard<'a, ()>;

/// A string key-value store.
///
/// Single `get`/`set`/`remove` calls are atomic. A read-modify-write spanning
/// several calls must hold [`lock`](Self::lock) for its whole duration.
///
/// Calls are synchronous and a write may touch the disk; async callers run
/// mutations on the blocking pool (see `AppState::blocking`).
pub trait KeyValueStore: Send + Sync {
    /// Take the store's mutation lock.
    ///
    /// The lock is re-entrant on the owning thread, so a service holding it
    /// can call into another service that takes it again.
    fn lock(&self) -> StoreLock<'_>;

    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store key names.
pub mod keys {
    use ecoquest_core::UserId;

    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "user";
    pub const CART: &str = "cart";
    pub const LAST_CHECKED_OUT: &str = "lastCheckedOutItems";
    pub const PRODUCTS_CACHE: &str = "envirProductsCache";

    /// Per-user quest list.
    #[must_use]
    pub fn quests(user_id: &UserId) -> String {
        format!("quests_{user_id}")
    }

    /// Per-user date of the last daily quest reset.
    #[must_use]
    pub fn last_quest_reset(user_id: &UserId) -> String {
        format!("lastQuestReset_{user_id}")
    }
}

/// Load and parse a JSON value.
///
/// Read failures and parse failures are logged and reported as `None`, so
/// callers fall back to their default state.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read from store");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to parse stored value, using default");
            None
        }
    }
}

/// Serialize a value to JSON and store it.
///
/// # Errors
///
/// Returns `StoreError` if serialization or the write fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(load_json::<Vec<u32>>(&store, "nothing"), None);
    }

    #[test]
    fn test_load_corrupt_value_falls_back() {
        let store = MemoryStore::new();
        store.set(keys::CART, "{not json".to_owned()).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, keys::CART), None);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_json(&store, "numbers", &[1_u32, 2, 3]).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, "numbers"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_user_scoped_keys() {
        let id = ecoquest_core::UserId::from("abc");
        assert_eq!(keys::quests(&id), "quests_abc");
        assert_eq!(keys::last_quest_reset(&id), "lastQuestReset_abc");
    }
}
