//! Router-level tests driving the HTTP surface with `oneshot` requests.
//!
//! The full signup -> verify -> login -> cart -> order flow runs against
//! the real router with the in-memory store injected.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use palengke_api::db::ProductStore;
use palengke_api::models::{NewProduct, Product, SellerIdentity};
use palengke_api::routes;
use palengke_api::state::AppState;
use palengke_core::{ProductId, UserId};

fn app(state: AppState) -> Router {
    Router::new().merge(routes::routes()).with_state(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request completes");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn bearer_request(method: &str, uri: &str, token: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds")
}

/// Seed a product directly through the store (product creation over HTTP is
/// multipart; the catalog workflow has its own tests).
async fn seed_product(store: &palengke_api::db::MemoryStore, owner: UserId) -> Product {
    store
        .create_product(Product::new(
            owner,
            SellerIdentity {
                first_name: "Juan".to_string(),
                last_name: "Dela Cruz".to_string(),
                business_name: "Juan's Gulayan".to_string(),
            },
            NewProduct {
                name: "Kalabasa".to_string(),
                quantity: 50,
                unit_price: "19.99".parse().expect("valid price"),
                description: Some("fresh from the farm".to_string()),
                category: palengke_core::Category::Gulay,
                image: None,
            },
        ))
        .await
        .expect("seed succeeds")
}

/// Signup and verify over HTTP, returning the login bearer token.
async fn signup_verify_login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/signup",
            &json!({
                "email": email,
                "password": "Password1",
                "confirmPassword": "Password1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["token"].as_str().expect("signup returns token");

    let (status, _) = send(
        app,
        Request::builder()
            .uri(format!("/auth/verify-email?token={token}"))
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            &json!({ "email": email, "password": "Password1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"]
        .as_str()
        .expect("login returns token")
        .to_string()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (state, _, _) = common::test_state();
    let app = app(state);

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/health/ready")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let (state, _, _) = common::test_state();
    let app = app(state);

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/cart")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "No token, authorization denied");

    let (status, body) = send(
        &app,
        bearer_request("GET", "/cart", "garbage-token", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Token is not valid");
}

#[tokio::test]
async fn login_before_verification_is_forbidden() {
    let (state, _, _) = common::test_state();
    let app = app(state);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/auth/signup",
            &json!({
                "email": "user@example.com",
                "password": "Password1",
                "confirmPassword": "Password1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            &json!({ "email": "user@example.com", "password": "Password1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["msg"], "Please verify your email first");
}

#[tokio::test]
async fn signup_rejects_password_mismatch() {
    let (state, _, _) = common::test_state();
    let app = app(state);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/signup",
            &json!({
                "email": "user@example.com",
                "password": "Password1",
                "confirmPassword": "Password2",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Passwords do not match");
}

#[tokio::test]
async fn full_cart_to_order_flow() {
    let (state, store, _) = common::test_state();
    let app = app(state);

    let token = signup_verify_login(&app, "buyer@example.com").await;
    let product = seed_product(&store, UserId::generate()).await;

    // Adding an unknown product is a 404.
    let (status, body) = send(
        &app,
        bearer_request(
            "POST",
            "/cart",
            &token,
            Some(&json!({ "productId": ProductId::generate(), "quantity": 1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Product not found");

    // Add 2, then 3 more of the same product.
    let (status, _) = send(
        &app,
        bearer_request(
            "POST",
            "/cart",
            &token,
            Some(&json!({ "productId": product.id, "quantity": 2 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        bearer_request(
            "POST",
            "/cart",
            &token,
            Some(&json!({ "productId": product.id, "quantity": 3 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().expect("cart has products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["quantity"], 5);

    // The cart view resolves products and derives per-line totals.
    let (status, body) = send(&app, bearer_request("GET", "/cart", &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().expect("cart has products");
    assert_eq!(products[0]["name"], "Kalabasa");
    assert_eq!(
        products[0]["totalPrice"],
        // 5 x 19.99
        json!("99.95")
    );

    // Place the order with a caller-supplied total.
    let (status, body) = send(
        &app,
        bearer_request(
            "POST",
            "/order/order",
            &token,
            Some(&json!({ "totalAmount": 99.99 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order placed successfully");
    assert_eq!(body["order"]["products"][0]["quantity"], 5);

    // The cart is gone afterwards.
    let (status, body) = send(&app, bearer_request("GET", "/cart", &token, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Cart not found");

    // Orders list returns the snapshot.
    let (status, body) = send(&app, bearer_request("GET", "/order/orders", &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().expect("orders array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["paymentStatus"], "Pending");
    assert_eq!(orders[0]["orderStatus"], "Processing");
}

#[tokio::test]
async fn empty_order_history_is_a_404() {
    let (state, _, _) = common::test_state();
    let app = app(state);

    let token = signup_verify_login(&app, "buyer@example.com").await;

    let (status, body) = send(&app, bearer_request("GET", "/order/orders", &token, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "No orders found");
}

#[tokio::test]
async fn product_listing_and_decrement_over_http() {
    let (state, store, _) = common::test_state();
    let app = app(state);

    let token = signup_verify_login(&app, "buyer@example.com").await;
    let product = seed_product(&store, UserId::generate()).await;

    // Public listing includes the seeded product.
    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/products")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Search by business name, no auth required.
    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/products/search?businessName=gulayan")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Decrement stock; over-decrement refused.
    let (status, body) = send(
        &app,
        bearer_request(
            "POST",
            &format!("/products/{}/order", product.id),
            &token,
            Some(&json!({ "orderQuantity": 60 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Insufficient quantity");

    let (status, body) = send(
        &app,
        bearer_request(
            "POST",
            &format!("/products/{}/order", product.id),
            &token,
            Some(&json!({ "orderQuantity": 20 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 30);

    // Soft-delete, then the listing is empty and reads 404.
    let (status, _) = send(
        &app,
        bearer_request(
            "DELETE",
            &format!("/products/{}", product.id),
            &token,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/products")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn profile_update_validates_and_roundtrips() {
    let (state, _, _) = common::test_state();
    let app = app(state);

    let token = signup_verify_login(&app, "seller@example.com").await;

    // Missing business name for a selling role is a 400.
    let (status, body) = send(
        &app,
        bearer_request(
            "PUT",
            "/userinfo",
            &token,
            Some(&json!({
                "firstName": "Juan",
                "lastName": "Dela Cruz",
                "contactNumber": "09171234567",
                "address": "Quezon City",
                "role": "seller",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Business name is required for sellers");

    let (status, _) = send(
        &app,
        bearer_request(
            "PUT",
            "/userinfo",
            &token,
            Some(&json!({
                "firstName": "Juan",
                "lastName": "Dela Cruz",
                "contactNumber": "09171234567",
                "address": "Quezon City",
                "role": "seller",
                "businessName": "Juan's Gulayan",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, bearer_request("GET", "/userinfo", &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Juan");
    assert_eq!(body["businessName"], "Juan's Gulayan");
    assert_eq!(body["role"], "seller");
}

#[tokio::test]
async fn account_lifecycle_over_http() {
    let (state, _, mailer) = common::test_state();
    let app = app(state);

    let token = signup_verify_login(&app, "user@example.com").await;

    let (status, body) = send(&app, bearer_request("GET", "/auth/account", &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "user@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let (status, _) = send(
        &app,
        bearer_request("DELETE", "/auth/account", &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The deletion notification went out.
    assert!(
        mailer
            .sent()
            .iter()
            .any(|e| e.subject == "Account Deletion")
    );

    // The account reads as gone afterwards.
    let (status, _) = send(&app, bearer_request("GET", "/auth/account", &token, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
