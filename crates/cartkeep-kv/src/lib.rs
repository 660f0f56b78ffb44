//! Async key-value storage for cartkeep.
//!
//! Stores plain strings under string keys. The cart layer serializes to JSON
//! on top of this; the stores themselves know nothing about the payload.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartkeep_kv::{FileStore, KeyValueStore};
//!
//! let store = FileStore::open(".cartkeep").await?;
//!
//! // Store a value
//! store.set("cart:user123", "[]".to_string()).await?;
//!
//! // Retrieve a value
//! let raw: Option<String> = store.get("cart:user123").await?;
//!
//! // Delete a value
//! store.delete("cart:user123").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::{KvError, KvResult};
pub use file::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, KeyValueStore, KvError, KvResult, MemoryStore};
}
