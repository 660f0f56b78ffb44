//! Explicit initialization point for a cart shared across an application.

use std::sync::{Arc, OnceLock};

use cartkeep_kv::KeyValueStore;

use crate::config::CartConfig;
use crate::error::CartError;
use crate::store::CartStore;

/// Holds the application's [`CartStore`] once it has been hydrated.
///
/// Accessing the cart before [`init`](Self::init) is a usage error and is
/// reported as one, never papered over with an empty cart. The context can
/// live in a `static`:
///
/// ```rust,ignore
/// static CART: CartContext = CartContext::new();
///
/// CART.init(Arc::new(store), CartConfig::default()).await?;
/// CART.cart()?.add_to_cart(item)?;
/// ```
#[derive(Debug, Default)]
pub struct CartContext {
    store: OnceLock<CartStore>,
}

impl CartContext {
    /// Create an uninitialized context.
    pub const fn new() -> Self {
        Self {
            store: OnceLock::new(),
        }
    }

    /// Hydrate a store from `kv` and install it.
    pub async fn init(
        &self,
        kv: Arc<dyn KeyValueStore>,
        config: CartConfig,
    ) -> Result<&CartStore, CartError> {
        if self.is_initialized() {
            return Err(CartError::AlreadyInitialized);
        }
        let store = CartStore::hydrate(kv, config).await?;
        self.provide(store)
    }

    /// Install an already hydrated store.
    pub fn provide(&self, store: CartStore) -> Result<&CartStore, CartError> {
        self.store
            .set(store)
            .map_err(|_| CartError::AlreadyInitialized)?;
        self.cart()
    }

    /// The installed store, or `NotInitialized`.
    pub fn cart(&self) -> Result<&CartStore, CartError> {
        self.store.get().ok_or(CartError::NotInitialized)
    }

    /// The installed store.
    ///
    /// # Panics
    ///
    /// Panics if the context has not been initialized.
    pub fn expect_cart(&self) -> &CartStore {
        match self.store.get() {
            Some(store) => store,
            None => panic!("{}", CartError::NotInitialized),
        }
    }

    /// Check if a store has been installed.
    pub fn is_initialized(&self) -> bool {
        self.store.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewLineItem;
    use cartkeep_kv::MemoryStore;

    #[test]
    fn test_access_before_init_fails() {
        let ctx = CartContext::new();
        let err = ctx.cart().unwrap_err();

        assert!(matches!(err, CartError::NotInitialized));
        assert!(err.to_string().contains("before CartContext was initialized"));
    }

    #[test]
    #[should_panic(expected = "cart accessed before CartContext was initialized")]
    fn test_expect_cart_panics_before_init() {
        let ctx = CartContext::new();
        ctx.expect_cart();
    }

    #[tokio::test]
    async fn test_init_then_use() {
        let ctx = CartContext::new();
        ctx.init(Arc::new(MemoryStore::new()), CartConfig::default())
            .await
            .unwrap();

        ctx.cart()
            .unwrap()
            .add_to_cart(NewLineItem::new("p1", "Shirt", 20.0))
            .unwrap();
        assert_eq!(ctx.expect_cart().snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_double_init_rejected() {
        let ctx = CartContext::new();
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        ctx.init(kv.clone(), CartConfig::default()).await.unwrap();
        let err = ctx.init(kv, CartConfig::default()).await.unwrap_err();

        assert!(matches!(err, CartError::AlreadyInitialized));
    }

    #[tokio::test]
    async fn test_static_context() {
        static CART: CartContext = CartContext::new();
        assert!(!CART.is_initialized());

        CART.init(Arc::new(MemoryStore::new()), CartConfig::default())
            .await
            .unwrap();
        assert!(CART.is_initialized());
    }
}
