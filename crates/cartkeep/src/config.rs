//! Cart store configuration.

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:products";

/// How mutations reach the key-value store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// A single writer task persists the latest snapshot. Writes never race
    /// and storage converges to the in-memory cart; intermediate snapshots
    /// may be skipped when mutations outpace the store.
    #[default]
    Serialized,
    /// Every mutation spawns its own write. Writes may land out of order, so
    /// a slow older write can overwrite a newer one.
    FireAndForget,
}

/// What hydration does with a stored record that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptRecordPolicy {
    /// Log a warning and start from an empty cart.
    #[default]
    Reset,
    /// Fail hydration with `CartError::CorruptRecord`.
    Fail,
}

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the cart record is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Persistence strategy.
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Handling of unparseable records on hydration.
    #[serde(default)]
    pub on_corrupt: CorruptRecordPolicy,

    /// Retry policy for failed writes.
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            write_mode: WriteMode::default(),
            on_corrupt: CorruptRecordPolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Set the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the write mode.
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Set the corrupt record policy.
    pub fn with_on_corrupt(mut self, policy: CorruptRecordPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
