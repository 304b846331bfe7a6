//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;

use palengke_core::ProductId;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::CartService;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Add a product to the authenticated user's cart, creating the cart on
/// first use. Responds with the updated cart.
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddItemRequest>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.store())
        .add_item(user_id, body.product_id, body.quantity)
        .await?;

    Ok(Json(cart))
}

/// The authenticated user's cart with resolved products and per-line
/// totals computed from current catalog prices.
pub async fn show(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.store()).get_cart(user_id).await?;

    Ok(Json(cart))
}

/// Remove a product from the authenticated user's cart. Removing a
/// product that isn't in the cart returns the unchanged cart.
pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.store())
        .remove_item(user_id, product_id)
        .await?;

    Ok(Json(cart))
}
