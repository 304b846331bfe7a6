//! Order workflow.
//!
//! Converts a cart into an immutable order snapshot, then deletes the cart.

use rust_decimal::Decimal;

use palengke_core::UserId;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Order, OrderView};
use crate::services::resolve_line_items;

/// Order service.
pub struct OrderService<'a> {
    store: &'a dyn Store,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Convert the actor's cart into an order.
    ///
    /// The order copies the cart's line items verbatim and stores the
    /// caller-supplied total as-is; the total is not recomputed from
    /// catalog prices and inventory is not decremented here.
    ///
    /// Order creation and cart deletion are two independent writes with no
    /// enclosing transaction: a crash between them leaves the cart behind
    /// next to the created order, and two concurrent placements can both
    /// read the cart before either deletion lands.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the cart is absent or empty.
    pub async fn place_order(
        &self,
        actor: UserId,
        total_amount: Decimal,
    ) -> Result<Order, AppError> {
        let cart = self
            .store
            .find_cart_by_owner(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        if cart.items.is_empty() {
            return Err(AppError::NotFound("Cart is empty".to_string()));
        }

        let order = self
            .store
            .create_order(Order::new(actor, cart.items, total_amount))
            .await?;

        self.store.delete_cart_by_owner(actor).await?;

        Ok(order)
    }

    /// All of the actor's orders, line items resolved against the current
    /// catalog. Zero orders is reported as `NotFound`, not an empty list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the actor has no orders.
    pub async fn list_orders(&self, actor: UserId) -> Result<Vec<OrderView>, AppError> {
        let orders = self.store.list_orders_by_owner(actor).await?;

        if orders.is_empty() {
            return Err(AppError::NotFound("No orders found".to_string()));
        }

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let items = resolve_line_items(self.store, &order.items).await?;
            views.push(OrderView::new(order, items));
        }

        Ok(views)
    }
}
