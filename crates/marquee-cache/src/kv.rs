//! Key-Value store wrapper with automatic serialization.

use crate::store::{FileStore, MemoryStore};
use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// A raw byte-oriented key-value backend.
///
/// Backends are used from a single thread; implementations may rely on
/// interior mutability instead of locking.
pub trait KvStore {
    /// Get the raw bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether `key` exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// Type-safe cache over a [`KvStore`] backend.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
pub struct Cache {
    store: Box<dyn KvStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing backend.
    pub fn new(store: impl KvStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Open a fresh in-memory cache.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open a file-backed cache rooted at `dir`, creating the directory if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir(".marquee/storage")?;
    /// ```
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::new(FileStore::open(dir)?))
    }

    /// Open the default Spin Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::SpinStore::open_default()?))
    }

    /// Open a named Spin Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::SpinStore::open(name)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("marquee:cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        tracing::trace!(key, bytes = bytes.len(), "cache set");
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("marquee", "cart");
/// // Returns "marquee:cart"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[test]
    fn test_set_then_get() {
        let cache = Cache::in_memory();
        let record = Record {
            name: "poster".to_string(),
            count: 2,
        };

        cache.set("marquee:record", &record).unwrap();
        let loaded: Option<Record> = cache.get("marquee:record").unwrap();
        assert_eq!(loaded, Some(record));
    }

    #[test]
    fn test_missing_key_is_none() {
        let cache = Cache::in_memory();
        let loaded: Option<Record> = cache.get("nope").unwrap();
        assert!(loaded.is_none());
        assert!(!cache.exists("nope").unwrap());
    }

    #[test]
    fn test_delete() {
        let cache = Cache::in_memory();
        cache.set("k", &1u32).unwrap();
        assert!(cache.exists("k").unwrap());

        cache.delete("k").unwrap();
        assert!(!cache.exists("k").unwrap());
        // Deleting again is fine.
        cache.delete("k").unwrap();
    }

    #[test]
    fn test_wrong_shape_is_serialize_error() {
        let cache = Cache::in_memory();
        cache.set("k", &"just a string").unwrap();
        let result: Result<Option<Record>, _> = cache.get("k");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_cache_key_macro() {
        let user = 42;
        assert_eq!(cache_key!("marquee", "cart"), "marquee:cart");
        assert_eq!(cache_key!("marquee", "cart", user), "marquee:cart:42");
    }
}
