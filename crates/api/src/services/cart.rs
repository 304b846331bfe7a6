//! Cart workflow.
//!
//! One cart per user, created lazily on the first add and persisted with an
//! owner-keyed upsert. Line items merge by increment per distinct product.

use palengke_core::{ProductId, UserId};

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Cart, CartView};
use crate::services::resolve_line_items;

/// Cart service.
pub struct CartService<'a> {
    store: &'a dyn Store,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Add a quantity of a product to the actor's cart, creating the cart
    /// if it doesn't exist yet. Adding a product already in the cart
    /// increments its line item rather than appending a second one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a quantity below 1.
    /// Returns `AppError::NotFound` if the product is absent or delisted.
    pub async fn add_item(
        &self,
        actor: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, AppError> {
        if quantity < 1 {
            return Err(AppError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        self.store
            .find_product(product_id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let mut cart = self
            .store
            .find_cart_by_owner(actor)
            .await?
            .unwrap_or_else(|| Cart::new(actor));

        cart.add(product_id, quantity);
        self.store.upsert_cart(&cart).await?;

        Ok(cart)
    }

    /// The actor's cart with line items resolved against the current
    /// catalog and per-line totals derived from current prices.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no cart exists for the actor.
    pub async fn get_cart(&self, actor: UserId) -> Result<CartView, AppError> {
        let cart = self
            .store
            .find_cart_by_owner(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        let items = resolve_line_items(self.store, &cart.items).await?;

        Ok(CartView {
            id: cart.id,
            user_id: cart.user_id,
            items,
            created_at: cart.created_at,
        })
    }

    /// Remove a product's line item from the actor's cart. Removing a
    /// product that isn't in the cart is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no cart exists for the actor.
    pub async fn remove_item(
        &self,
        actor: UserId,
        product_id: ProductId,
    ) -> Result<Cart, AppError> {
        let mut cart = self
            .store
            .find_cart_by_owner(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        cart.remove(product_id);
        self.store.upsert_cart(&cart).await?;

        Ok(cart)
    }
}
