//! The cart and its transitions.
//!
//! Every transition takes `&self` and returns a new [`Cart`]; a cart that has
//! been handed out as a snapshot is never modified.

use crate::cart::{LineItem, NewLineItem};
use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// An ordered set of line items, unique by product id.
///
/// Serializes as a bare JSON array of [`LineItem`]. Deserializing goes
/// through [`Cart::from_items`], so the result always holds the invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw items, restoring the cart invariants.
    ///
    /// Items with a zero quantity are dropped. Repeated ids are merged into
    /// the first occurrence, summing quantities; the later entry's display
    /// fields win.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    let quantity = existing.quantity.saturating_add(item.quantity);
                    *existing = LineItem { quantity, ..item };
                }
                None => merged.push(item),
            }
        }
        Self { items: merged }
    }

    /// Add one unit of `candidate`.
    ///
    /// A new product is appended with quantity 1. A product already in the
    /// cart keeps its position, takes the candidate's title, image and price,
    /// and gains one unit.
    ///
    /// Returns `InvalidPrice` if the candidate's price is not finite.
    pub fn with_added(&self, candidate: NewLineItem) -> Result<Self, CartError> {
        if !candidate.price.is_finite() {
            return Err(CartError::InvalidPrice {
                id: candidate.id.to_string(),
                price: candidate.price,
            });
        }

        let mut items = self.items.clone();
        match items.iter().position(|i| i.id == candidate.id) {
            Some(index) => {
                let quantity = items[index].quantity.saturating_add(1);
                items[index] = LineItem::from_candidate(candidate, quantity);
            }
            None => items.push(LineItem::from_candidate(candidate, 1)),
        }
        Ok(Self { items })
    }

    /// Add one unit to the item with `id`. Unknown ids leave the cart as is.
    pub fn with_incremented(&self, id: &ProductId) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if &item.id == id {
                    LineItem {
                        quantity: item.quantity.saturating_add(1),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// Remove one unit from the item with `id`, dropping it at zero.
    ///
    /// Returns `ItemNotInCart` if no item has that id.
    pub fn with_decremented(&self, id: &ProductId) -> Result<Self, CartError> {
        let index = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| CartError::ItemNotInCart(id.to_string()))?;

        let mut items = self.items.clone();
        if items[index].quantity <= 1 {
            items.remove(index);
        } else {
            items[index].quantity -= 1;
        }
        Ok(Self { items })
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Get an item by product id.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of unique items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the cart and return its items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> NewLineItem {
        NewLineItem::new("p1", "Shirt", 20.0)
    }

    fn cart_with(id: &str, quantity: u32) -> Cart {
        Cart::from_items(vec![LineItem::from_candidate(
            NewLineItem::new(id, "Shirt", 20.0),
            quantity,
        )])
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_to_empty_cart() {
        let cart = Cart::new().with_added(shirt()).unwrap();

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.id, "p1");
        assert_eq!(item.title, "Shirt");
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_add_same_item_merges_and_refreshes() {
        let cart = Cart::new()
            .with_added(shirt())
            .and_then(|cart| {
                cart.with_added(NewLineItem::new("p1", "Shirt (new)", 25.0).with_image_url("img"))
            })
            .unwrap();

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 25.0);
        assert_eq!(item.title, "Shirt (new)");
        assert_eq!(item.image_url, "img");
    }

    #[test]
    fn test_add_preserves_position() {
        let cart = [("a", 1.0), ("b", 2.0), ("c", 3.0), ("a", 1.5)]
            .into_iter()
            .try_fold(Cart::new(), |cart, (id, price)| {
                cart.with_added(NewLineItem::new(id, id.to_uppercase(), price))
            })
            .unwrap();

        let ids: Vec<&str> = cart.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_add_never_duplicates_ids() {
        let ids = ["a", "b", "a", "c", "b", "a"];
        let cart = ids
            .iter()
            .try_fold(Cart::new(), |cart, id| cart.with_added(NewLineItem::new(*id, *id, 1.0)))
            .unwrap();

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.get(&"a".into()).unwrap().quantity, 3);
        assert_eq!(cart.get(&"b".into()).unwrap().quantity, 2);
        assert_eq!(cart.get(&"c".into()).unwrap().quantity, 1);
    }

    #[test]
    fn test_increment() {
        let cart = cart_with("p1", 1).with_incremented(&"p1".into());
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_increment_missing_is_noop() {
        let before = cart_with("p1", 1);
        let after = before.with_incremented(&"p9".into());
        assert_eq!(before, after);
    }

    #[test]
    fn test_decrement_last_unit_removes_item() {
        let cart = cart_with("p1", 1).with_decremented(&"p1".into()).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_keeps_other_fields() {
        let before = cart_with("p1", 3);
        let after = before.with_decremented(&"p1".into()).unwrap();

        let item = &after.items()[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.title, before.items()[0].title);
        assert_eq!(item.price, before.items()[0].price);
    }

    #[test]
    fn test_decrement_missing_is_error() {
        let cart = cart_with("p1", 1);
        let err = cart.with_decremented(&"p9".into()).unwrap_err();
        assert!(matches!(err, CartError::ItemNotInCart(id) if id == "p9"));
    }

    #[test]
    fn test_transitions_leave_source_untouched() {
        let original = cart_with("p1", 2);
        let _ = original.with_added(shirt());
        let _ = original.with_incremented(&"p1".into());
        let _ = original.with_decremented(&"p1".into());

        assert_eq!(original.items()[0].quantity, 2);
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let items = vec![
            LineItem::from_candidate(NewLineItem::new("a", "A", 1.0), 2),
            LineItem::from_candidate(NewLineItem::new("b", "B", 2.0), 0),
            LineItem::from_candidate(NewLineItem::new("a", "A2", 1.5), 3),
        ];
        let cart = Cart::from_items(items);

        assert_eq!(cart.len(), 1);
        let a = &cart.items()[0];
        assert_eq!(a.quantity, 5);
        assert_eq!(a.title, "A2");
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = cart_with("p1", 1);
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let cart = cart_with("p1", 1);

        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = cart
                .with_added(NewLineItem::new("p2", "Mug", price))
                .unwrap_err();
            assert!(matches!(err, CartError::InvalidPrice { ref id, .. } if id == "p2"));
        }
    }

    #[test]
    fn test_non_finite_price_rejected_for_existing_item() {
        let cart = cart_with("p1", 2);
        assert!(cart.with_added(NewLineItem::new("p1", "Shirt", f64::NAN)).is_err());
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_deserialize_restores_invariants() {
        let json = r#"[
            {"id":"a","price":1,"quantity":2},
            {"id":"b","price":2,"quantity":0},
            {"id":"a","price":1,"quantity":1}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }
}
