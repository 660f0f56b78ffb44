//! Cart error types.

use cartkeep_kv::KvError;
use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// The cart was used before its context was initialized.
    #[error("cart accessed before CartContext was initialized")]
    NotInitialized,

    /// The context was initialized twice.
    #[error("CartContext is already initialized")]
    AlreadyInitialized,

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// The persisted cart record could not be parsed.
    #[error("Persisted cart record is malformed: {0}")]
    CorruptRecord(#[source] serde_json::Error),

    /// Key-value store error.
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// A candidate's price is NaN or infinite and cannot be persisted.
    #[error("Invalid price for {id}: {price}")]
    InvalidPrice { id: String, price: f64 },

    /// The persistence writer task has stopped.
    #[error("Cart writer has shut down")]
    WriterClosed,
}
