//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use palengke_core::{CartId, ProductId, UserId};

/// A (product, quantity) pair inside a cart or order.
///
/// Serialized both onto the wire and into the store's line-item document,
/// so the field names are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A user's shopping cart. At most one exists per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    /// Line items, at most one per distinct product.
    #[serde(rename = "products")]
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart for a user. Carts come into existence lazily,
    /// on the first add.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: CartId::generate(),
            user_id,
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add `quantity` units of a product, merging into an existing line
    /// item when one is present.
    pub fn add(&mut self, product_id: ProductId, quantity: i32) {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => item.quantity += quantity,
            None => self.items.push(LineItem {
                product_id,
                quantity,
            }),
        }
    }

    /// Drop the line item for a product. Removing an absent product is a
    /// no-op, not an error.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }
}

/// A line item with its product reference resolved against the current
/// catalog. The total is derived at read time, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i32,
    /// `quantity x` the product's *current* unit price. Displayed totals
    /// can therefore drift between reads as catalog prices change.
    #[serde(rename = "totalPrice")]
    pub line_total: Decimal,
}

/// Cart view with resolved products and derived per-line totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: CartId,
    pub user_id: UserId,
    #[serde(rename = "products")]
    pub items: Vec<ResolvedLineItem>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_duplicate_products() {
        let mut cart = Cart::new(UserId::generate());
        let product = ProductId::generate();

        cart.add(product, 2);
        cart.add(product, 3);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|i| i.quantity), Some(5));
    }

    #[test]
    fn test_add_keeps_distinct_products_separate() {
        let mut cart = Cart::new(UserId::generate());
        cart.add(ProductId::generate(), 1);
        cart.add(ProductId::generate(), 1);

        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut cart = Cart::new(UserId::generate());
        cart.add(ProductId::generate(), 4);

        cart.remove(ProductId::generate());

        assert_eq!(cart.items.len(), 1);
    }
}
