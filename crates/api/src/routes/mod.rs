//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the store)
//!
//! # Auth
//! POST   /auth/signup               - Register (sends verification email)
//! GET    /auth/verify-email         - Verify email via token query param
//! POST   /auth/login                - Login, returns bearer token
//! POST   /auth/logout               - Logout (requires auth)
//! GET    /auth/account              - Account details (requires auth)
//! DELETE /auth/account              - Soft-delete account (requires auth)
//! PUT    /auth/account/change-password - Change password (requires auth)
//!
//! # Profile
//! GET  /userinfo                    - Profile subset (requires auth)
//! PUT  /userinfo                    - Update profile (requires auth)
//!
//! # Products
//! POST   /products                  - Create listing, multipart (requires auth)
//! GET    /products                  - All live listings
//! GET    /products/search           - Search by category/name/business name
//! PUT    /products/{id}             - Update listing, multipart (requires auth)
//! DELETE /products/{id}             - Soft-delete listing (requires auth)
//! POST   /products/{id}/order       - Decrement stock for an order (requires auth)
//!
//! # Cart
//! POST   /cart                      - Add item (requires auth)
//! GET    /cart                      - Cart with computed totals (requires auth)
//! DELETE /cart/{productId}          - Remove item (requires auth)
//!
//! # Orders
//! POST /order/order                 - Place order from cart (requires auth)
//! GET  /order/orders                - List orders (requires auth)
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/verify-email", get(auth::verify_email))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route(
            "/account",
            get(auth::account).delete(auth::delete_account),
        )
        .route("/account/change-password", put(auth::change_password))
}

/// Create the profile routes router.
pub fn userinfo_routes() -> Router<AppState> {
    Router::new().route("/", get(users::profile).put(users::update_profile))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create).get(products::list))
        .route("/search", get(products::search))
        .route(
            "/{id}",
            put(products::update).delete(products::soft_delete),
        )
        .route("/{id}/order", post(products::decrement_on_order))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::add_item).get(cart::show))
        .route("/{productId}", axum::routing::delete(cart::remove_item))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(orders::place_order))
        .route("/orders", get(orders::list_orders))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/userinfo", userinfo_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/order", order_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
