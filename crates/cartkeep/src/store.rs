//! The cart store.
//!
//! [`CartStore`] owns the authoritative in-memory [`Cart`]. Mutations compute
//! a new cart from the current one and publish it atomically; readers only
//! ever see whole, immutable snapshots. Every published snapshot is then
//! written through to the key-value store according to the configured
//! [`WriteMode`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cartkeep::prelude::*;
//! use cartkeep_kv::MemoryStore;
//!
//! let store = CartStore::hydrate(Arc::new(MemoryStore::new()), CartConfig::default()).await?;
//!
//! store.add_to_cart(NewLineItem::new("p1", "Shirt", 20.0))?;
//! store.increment("p1");
//! store.decrement("p1")?;
//!
//! store.flush().await?;
//! ```

use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use cartkeep_kv::KeyValueStore;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cart::{Cart, NewLineItem};
use crate::config::{CartConfig, CorruptRecordPolicy, WriteMode};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::writer::{self, WriteTarget};

/// A published cart together with its mutation counter.
///
/// Version 0 is the hydrated cart; every mutation publishes the next version.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    /// Monotonic mutation counter.
    pub version: u64,
    /// The cart as of this version.
    pub cart: Arc<Cart>,
}

/// Shared handle to the cart. Cloning is cheap; all clones see the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<CartSnapshot>,
    flushed: watch::Receiver<u64>,
    target: Arc<WriteTarget>,
    persistence: Persistence,
}

enum Persistence {
    Serialized,
    FireAndForget {
        runtime: Handle,
        flushed: Arc<watch::Sender<u64>>,
        pending: Mutex<JoinSet<()>>,
    },
}

impl CartStore {
    /// Load the cart record from `store` and start the store.
    ///
    /// A missing or blank record gives an empty cart. A record that does not
    /// parse is handled per [`CartConfig::on_corrupt`]. Must be called from
    /// within a tokio runtime; writes are spawned on it.
    pub async fn hydrate(
        store: Arc<dyn KeyValueStore>,
        config: CartConfig,
    ) -> Result<Self, CartError> {
        let raw = store.get(&config.storage_key).await?;

        let cart = match raw.as_deref().map(str::trim) {
            None | Some("") => Cart::new(),
            Some(text) => match serde_json::from_str::<Cart>(text) {
                Ok(cart) => cart,
                Err(e) => match config.on_corrupt {
                    CorruptRecordPolicy::Reset => {
                        warn!(
                            key = %config.storage_key,
                            error = %e,
                            "discarding malformed cart record"
                        );
                        Cart::new()
                    }
                    CorruptRecordPolicy::Fail => return Err(CartError::CorruptRecord(e)),
                },
            },
        };

        info!(
            key = %config.storage_key,
            items = cart.len(),
            units = cart.item_count(),
            "hydrated cart"
        );

        Ok(Self::start(store, config, cart, Handle::current()))
    }

    fn start(
        store: Arc<dyn KeyValueStore>,
        config: CartConfig,
        cart: Cart,
        runtime: Handle,
    ) -> Self {
        let (state, snapshots) = watch::channel(CartSnapshot {
            version: 0,
            cart: Arc::new(cart),
        });
        let (flushed_tx, flushed) = watch::channel(0u64);
        let target = Arc::new(WriteTarget::new(store, config.storage_key, config.retry));

        let persistence = match config.write_mode {
            WriteMode::Serialized => {
                runtime.spawn(writer::run_serialized(
                    Arc::clone(&target),
                    snapshots,
                    flushed_tx,
                ));
                Persistence::Serialized
            }
            WriteMode::FireAndForget => {
                drop(snapshots);
                Persistence::FireAndForget {
                    runtime,
                    flushed: Arc::new(flushed_tx),
                    pending: Mutex::new(JoinSet::new()),
                }
            }
        };

        Self {
            inner: Arc::new(Inner {
                state,
                flushed,
                target,
                persistence,
            }),
        }
    }

    /// The current cart.
    ///
    /// Reflects every mutation that has returned, whether or not its write
    /// has reached storage yet.
    pub fn snapshot(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.state.borrow().cart)
    }

    /// The current cart with its version.
    pub fn versioned_snapshot(&self) -> CartSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Watch the cart for changes.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.state.subscribe()
    }

    /// Version of the latest published snapshot.
    pub fn version(&self) -> u64 {
        self.inner.state.borrow().version
    }

    /// Latest version whose write has finished, successfully or not.
    pub fn flushed_version(&self) -> u64 {
        *self.inner.flushed.borrow()
    }

    /// Number of writes that were abandoned after exhausting retries.
    pub fn failed_writes(&self) -> u64 {
        self.inner.target.failed_writes()
    }

    /// Add one unit of `candidate`, merging with an existing line by id.
    ///
    /// Returns `InvalidPrice` for a NaN or infinite price; nothing is
    /// published or written in that case.
    pub fn add_to_cart(&self, candidate: NewLineItem) -> Result<Arc<Cart>, CartError> {
        let id = candidate.id.clone();
        let cart = self.try_publish(|cart| cart.with_added(candidate))?;
        debug!(%id, quantity = quantity_of(&cart, &id), "added to cart");
        Ok(cart)
    }

    /// Add one unit to the item with `id`. Unknown ids are a silent no-op
    /// (the unchanged cart is still re-persisted).
    pub fn increment(&self, id: impl Into<ProductId>) -> Arc<Cart> {
        let id = id.into();
        let cart = self.publish(|cart| cart.with_incremented(&id));
        debug!(%id, quantity = quantity_of(&cart, &id), "incremented");
        cart
    }

    /// Remove one unit from the item with `id`, dropping the line at zero.
    ///
    /// Returns `ItemNotInCart` if the id is absent; nothing is published or
    /// written in that case.
    pub fn decrement(&self, id: impl Into<ProductId>) -> Result<Arc<Cart>, CartError> {
        let id = id.into();
        let cart = self.try_publish(|cart| cart.with_decremented(&id))?;
        debug!(%id, quantity = quantity_of(&cart, &id), "decremented");
        Ok(cart)
    }

    /// Empty the cart and persist the empty record.
    pub fn clear(&self) -> Arc<Cart> {
        let cart = self.publish(|_| Cart::new());
        debug!("cleared cart");
        cart
    }

    /// Wait until every write issued so far has finished.
    pub async fn flush(&self) -> Result<(), CartError> {
        match &self.inner.persistence {
            Persistence::Serialized => {
                let target = self.version();
                let mut flushed = self.inner.flushed.clone();
                flushed
                    .wait_for(|v| *v >= target)
                    .await
                    .map_err(|_| CartError::WriterClosed)?;
            }
            Persistence::FireAndForget { pending, .. } => {
                let mut tasks = {
                    let mut guard = pending.lock().unwrap_or_else(PoisonError::into_inner);
                    std::mem::take(&mut *guard)
                };
                while let Some(result) = tasks.join_next().await {
                    if let Err(e) = result {
                        warn!(error = %e, "cart write task did not complete");
                    }
                }
            }
        }
        Ok(())
    }

    fn publish<F>(&self, transition: F) -> Arc<Cart>
    where
        F: FnOnce(&Cart) -> Cart,
    {
        match self.try_publish(|cart| Ok::<_, Infallible>(transition(cart))) {
            Ok(cart) => cart,
            Err(never) => match never {},
        }
    }

    /// Compute the next cart from the current one and publish it.
    ///
    /// The whole read-compute-publish span runs under the watch channel's
    /// write lock, so concurrent mutations are applied one after another.
    fn try_publish<F, E>(&self, transition: F) -> Result<Arc<Cart>, E>
    where
        F: FnOnce(&Cart) -> Result<Cart, E>,
    {
        let mut outcome = None;
        self.inner.state.send_if_modified(|current| {
            match transition(&current.cart) {
                Ok(next) => {
                    *current = CartSnapshot {
                        version: current.version + 1,
                        cart: Arc::new(next),
                    };
                    self.spawn_write(current);
                    outcome = Some(Ok(Arc::clone(&current.cart)));
                    true
                }
                Err(e) => {
                    outcome = Some(Err(e));
                    false
                }
            }
        });
        outcome.unwrap_or_else(|| Ok(self.snapshot()))
    }

    fn spawn_write(&self, snapshot: &CartSnapshot) {
        // Serialized mode: the writer task is woken by the watch channel.
        if let Persistence::FireAndForget {
            runtime,
            flushed,
            pending,
        } = &self.inner.persistence
        {
            let target = Arc::clone(&self.inner.target);
            let flushed = Arc::clone(flushed);
            let snapshot = snapshot.clone();

            let mut tasks = pending.lock().unwrap_or_else(PoisonError::into_inner);
            while tasks.try_join_next().is_some() {}
            tasks.spawn_on(
                async move {
                    target.write(&snapshot).await;
                    writer::mark_flushed(&flushed, snapshot.version);
                },
                runtime,
            );
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Issued writes outlive the last handle, as the serialized writer does.
        if let Persistence::FireAndForget { pending, .. } = &mut self.persistence {
            pending
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .detach_all();
        }
    }
}

fn quantity_of(cart: &Cart, id: &ProductId) -> u32 {
    cart.get(id).map_or(0, |item| item.quantity)
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.inner.state.borrow();
        f.debug_struct("CartStore")
            .field("version", &snapshot.version)
            .field("items", &snapshot.cart.len())
            .finish()
    }
}
