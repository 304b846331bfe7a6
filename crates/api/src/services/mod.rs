//! Domain workflows.
//!
//! Each service wraps the storage port and implements one workflow family.
//! Routes construct them per request from [`crate::state::AppState`].

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod email;
pub mod order;
pub mod token;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use email::{Mailer, RecordingMailer, SmtpMailer};
pub use order::OrderService;
pub use token::TokenService;

use rust_decimal::Decimal;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{LineItem, ResolvedLineItem};

/// Resolve line items against the current catalog, deriving per-line totals
/// from the product's *current* unit price (totals are never stored).
///
/// Soft-deleted products still resolve: a delisting must not corrupt the
/// view of a cart or order that already references the product.
pub(crate) async fn resolve_line_items(
    store: &dyn Store,
    items: &[LineItem],
) -> Result<Vec<ResolvedLineItem>, AppError> {
    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        let product = store.find_product(item.product_id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "line item references missing product {}",
                item.product_id
            ))
        })?;

        let line_total = product.unit_price * Decimal::from(item.quantity);
        resolved.push(ResolvedLineItem {
            product_id: item.product_id,
            name: product.name,
            unit_price: product.unit_price,
            description: product.description,
            quantity: item.quantity,
            line_total,
        });
    }
    Ok(resolved)
}
