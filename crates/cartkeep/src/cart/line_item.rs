//! Line item types.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// One distinct product in the cart.
///
/// The persisted form uses `image_url` in snake case:
///
/// ```json
/// {"id":"p1","title":"Shirt","image_url":"https://...","price":20.0,"quantity":1}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product identity.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub title: String,
    /// Display-only image reference.
    #[serde(default)]
    pub image_url: String,
    /// Unit price, currency-agnostic.
    pub price: f64,
    /// Units in the cart. Always at least 1 while the item is present.
    pub quantity: u32,
}

impl LineItem {
    /// Build a line item from a candidate with an explicit quantity.
    pub fn from_candidate(candidate: NewLineItem, quantity: u32) -> Self {
        Self {
            id: candidate.id,
            title: candidate.title,
            image_url: candidate.image_url,
            price: candidate.price,
            quantity,
        }
    }
}

/// A product offered to the cart: everything a [`LineItem`] has except the
/// quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewLineItem {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    pub price: f64,
}

impl NewLineItem {
    /// Create a candidate with no image.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: String::new(),
            price,
        }
    }

    /// Set the image reference.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}

impl From<LineItem> for NewLineItem {
    fn from(item: LineItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
        }
    }
}
