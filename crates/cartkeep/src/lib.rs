//! Shopping cart state with write-through key-value persistence.
//!
//! This crate provides:
//!
//! - **Cart**: ordered line items, unique by product id, with pure
//!   add / increment / decrement transitions
//! - **CartStore**: the authoritative in-memory cart, published as immutable
//!   snapshots and written through to a [`cartkeep_kv::KeyValueStore`]
//! - **CartContext**: an explicit initialization point that refuses access
//!   before the cart has been hydrated
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cartkeep::prelude::*;
//! use cartkeep_kv::FileStore;
//!
//! let kv = Arc::new(FileStore::open(".cartkeep").await?);
//! let store = CartStore::hydrate(kv, CartConfig::default()).await?;
//!
//! store.add_to_cart(NewLineItem::new("p1", "Shirt", 20.0))?;
//! store.add_to_cart(NewLineItem::new("p1", "Shirt", 25.0))?; // quantity 2, price 25
//! store.decrement("p1")?;
//!
//! for item in store.snapshot().iter() {
//!     println!("{} x{}", item.title, item.quantity);
//! }
//! store.flush().await?;
//! ```

pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod retry;
pub mod store;
mod writer;

pub use cart::{Cart, LineItem, NewLineItem};
pub use config::{CartConfig, CorruptRecordPolicy, WriteMode, DEFAULT_STORAGE_KEY};
pub use context::CartContext;
pub use error::CartError;
pub use ids::ProductId;
pub use retry::{BackoffStrategy, RetryPolicy};
pub use store::{CartSnapshot, CartStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, LineItem, NewLineItem};
    pub use crate::config::{CartConfig, CorruptRecordPolicy, WriteMode};
    pub use crate::context::CartContext;
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::store::{CartSnapshot, CartStore};
}
