//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::OrderService;
use crate::state::AppState;

/// Place-order request body. The total is caller-supplied and stored
/// verbatim; the server does not recompute it from catalog prices.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub total_amount: Decimal,
}

/// Convert the authenticated user's cart into an order. Responds 201 with
/// the created order; the cart is gone afterwards.
pub async fn place_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.store())
        .place_order(user_id, body.total_amount)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "order": order,
        })),
    ))
}

/// All of the authenticated user's orders with resolved line items.
/// A user with no orders gets 404, not an empty list.
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.store()).list_orders(user_id).await?;

    Ok(Json(orders))
}
