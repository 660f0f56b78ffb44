//! Shopping cart module.
//!
//! Contains the line item types and the pure cart transitions. Nothing in
//! here touches storage; see [`crate::store`] for that.

mod cart;
mod line_item;

pub use cart::Cart;
pub use line_item::{LineItem, NewLineItem};
