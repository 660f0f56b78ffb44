//! Persistence of cart snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cartkeep_kv::KeyValueStore;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::retry::RetryPolicy;
use crate::store::CartSnapshot;

/// Where and how snapshots are written.
pub(crate) struct WriteTarget {
    store: Arc<dyn KeyValueStore>,
    key: String,
    retry: RetryPolicy,
    failed_writes: AtomicU64,
}

impl WriteTarget {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>, key: String, retry: RetryPolicy) -> Self {
        Self {
            store,
            key,
            retry,
            failed_writes: AtomicU64::new(0),
        }
    }

    pub(crate) fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Write the full snapshot under the cart key, retrying per policy.
    ///
    /// Returns whether the write landed. Failures are logged, never raised:
    /// the in-memory cart stays authoritative either way.
    pub(crate) async fn write(&self, snapshot: &CartSnapshot) -> bool {
        let payload = match serde_json::to_string(snapshot.cart.as_ref()) {
            Ok(payload) => payload,
            Err(e) => {
                error!(version = snapshot.version, error = %e, "failed to serialize cart");
                self.failed_writes.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        };

        let mut attempt = 0;
        loop {
            match self.store.set(&self.key, payload.clone()).await {
                Ok(()) => {
                    debug!(
                        version = snapshot.version,
                        items = snapshot.cart.len(),
                        key = %self.key,
                        "persisted cart"
                    );
                    return true;
                }
                Err(e) if self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        version = snapshot.version,
                        attempt = attempt + 1,
                        ?delay,
                        error = %e,
                        "cart write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        version = snapshot.version,
                        error = %e,
                        "cart write failed, giving up"
                    );
                    self.failed_writes.fetch_add(1, Ordering::Relaxed);
                    return false;
                }
            }
        }
    }
}

/// Record `version` as flushed unless a newer version already is.
pub(crate) fn mark_flushed(flushed: &watch::Sender<u64>, version: u64) {
    flushed.send_if_modified(|current| {
        if version > *current {
            *current = version;
            true
        } else {
            false
        }
    });
}

/// Single-writer loop: persist whatever snapshot is newest, one write at a
/// time, until every store handle is gone.
pub(crate) async fn run_serialized(
    target: Arc<WriteTarget>,
    mut snapshots: watch::Receiver<CartSnapshot>,
    flushed: watch::Sender<u64>,
) {
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        target.write(&snapshot).await;
        mark_flushed(&flushed, snapshot.version);
    }
    debug!("cart writer stopped");
}
