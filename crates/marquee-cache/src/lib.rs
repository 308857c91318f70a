//! Durable, type-safe key-value storage for the Marquee storefront.
//!
//! A [`Cache`] wraps any [`KvStore`] backend and handles JSON serialization,
//! so callers read and write their own types:
//!
//! - [`MemoryStore`]: process-local, shared between clones (tests, previews)
//! - [`FileStore`]: one JSON file per key under a directory
//! - `SpinStore`: Spin's Key-Value Store (`wasm32` only)
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_cache::{cache_key, Cache};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<CartItem>,
//! }
//!
//! let cache = Cache::open_dir(".marquee/storage")?;
//! let key = cache_key!("marquee", "cart");
//!
//! cache.set(&key, &cart)?;
//! let cart: Option<Cart> = cache.get(&key)?;
//! cache.delete(&key)?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::{Cache, KvStore};
pub use store::{FileStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use store::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
