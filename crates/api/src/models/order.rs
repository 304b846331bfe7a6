//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use palengke_core::{OrderId, OrderStatus, PaymentStatus, UserId};

use super::cart::{LineItem, ResolvedLineItem};

/// A placed order.
///
/// The line items are a point-in-time copy of the cart at conversion and
/// are never mutated by later catalog changes. The total amount is the
/// caller-supplied figure, stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(rename = "products")]
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot a cart's line items into a new order.
    #[must_use]
    pub fn new(user_id: UserId, items: Vec<LineItem>, total_amount: Decimal) -> Self {
        Self {
            id: OrderId::generate(),
            user_id,
            items,
            total_amount,
            payment_status: PaymentStatus::default(),
            order_status: OrderStatus::default(),
            created_at: Utc::now(),
        }
    }
}

/// Order view with line items resolved against the current catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(rename = "products")]
    pub items: Vec<ResolvedLineItem>,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderView {
    /// Pair an order with its resolved line items.
    #[must_use]
    pub fn new(order: Order, items: Vec<ResolvedLineItem>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            items,
            total_amount: order.total_amount,
            payment_status: order.payment_status,
            order_status: order.order_status,
            created_at: order.created_at,
        }
    }
}
