//! Product route handlers.
//!
//! Listing writes arrive as `multipart/form-data` (the image rides along
//! with the text fields). Uploaded images are written to the configured
//! upload directory as `{unix_millis}-{original_name}` and the listing
//! stores the relative path.

use std::path::Path as FsPath;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use palengke_core::{Category, ProductId};

use crate::db::ProductSearch;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{NewProduct, ProductChanges};
use crate::services::CatalogService;
use crate::state::AppState;

/// Search query parameters. Absent fields don't constrain the result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub category: Option<String>,
    pub name: Option<String>,
    pub business_name: Option<String>,
}

/// Stock decrement request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecrementRequest {
    pub order_quantity: i32,
}

/// Fields collected from a multipart product form. Empty text fields are
/// treated as absent.
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    quantity: Option<i32>,
    unit_price: Option<Decimal>,
    description: Option<String>,
    category: Option<Category>,
    image: Option<String>,
}

async fn parse_product_form(
    mut multipart: Multipart,
    upload_dir: &FsPath,
) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => form.name = non_empty(text(field).await?),
            "quantity" => {
                if let Some(value) = non_empty(text(field).await?) {
                    let quantity = value
                        .parse::<i32>()
                        .map_err(|_| AppError::Validation("Quantity must be a number".into()))?;
                    form.quantity = Some(quantity);
                }
            }
            "unitPrice" => {
                if let Some(value) = non_empty(text(field).await?) {
                    let unit_price = value
                        .parse::<Decimal>()
                        .map_err(|_| AppError::Validation("Unit price must be a number".into()))?;
                    form.unit_price = Some(unit_price);
                }
            }
            "description" => form.description = non_empty(text(field).await?),
            "category" => {
                if let Some(value) = non_empty(text(field).await?) {
                    let category = value
                        .parse::<Category>()
                        .map_err(|_| AppError::Validation("Invalid category".into()))?;
                    form.category = Some(category);
                }
            }
            "image" => {
                let file_name = field.file_name().map(ToString::to_string);
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Malformed form data: {e}"))
                })?;
                if let Some(file_name) = file_name.filter(|f| !f.is_empty() && !data.is_empty()) {
                    form.image = Some(save_upload(upload_dir, &file_name, &data).await?);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Write an uploaded image under the upload directory, returning the
/// stored relative path.
async fn save_upload(upload_dir: &FsPath, file_name: &str, data: &[u8]) -> Result<String> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;

    let stored_name = format!("{}-{file_name}", Utc::now().timestamp_millis());
    let path = upload_dir.join(stored_name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store upload: {e}")))?;

    Ok(path.to_string_lossy().into_owned())
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a listing. Responds 201 with the created product.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = parse_product_form(multipart, &state.config().upload_dir).await?;

    let input = NewProduct {
        name: form
            .name
            .ok_or_else(|| AppError::Validation("Name is required".to_string()))?,
        quantity: form
            .quantity
            .ok_or_else(|| AppError::Validation("Quantity must be a number".to_string()))?,
        unit_price: form
            .unit_price
            .ok_or_else(|| AppError::Validation("Unit price must be a number".to_string()))?,
        description: form.description,
        category: form
            .category
            .ok_or_else(|| AppError::Validation("Invalid category".to_string()))?,
        image: form.image,
    };

    let product = CatalogService::new(state.store(), state.mailer())
        .create(user_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a listing in place. Absent fields keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = parse_product_form(multipart, &state.config().upload_dir).await?;

    let changes = ProductChanges {
        name: form.name,
        quantity: form.quantity,
        unit_price: form.unit_price,
        description: form.description,
        category: form.category,
        image: form.image,
    };

    let product = CatalogService::new(state.store(), state.mailer())
        .update(user_id, id, changes)
        .await?;

    Ok(Json(product))
}

/// Soft-delete a listing.
pub async fn soft_delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    CatalogService::new(state.store(), state.mailer())
        .soft_delete(user_id, id)
        .await?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

/// All live listings.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = CatalogService::new(state.store(), state.mailer())
        .list()
        .await?;

    Ok(Json(products))
}

/// Search live listings by category, name, or business name.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let search = ProductSearch {
        category: query.category,
        name: query.name,
        business_name: query.business_name,
    };

    let products = CatalogService::new(state.store(), state.mailer())
        .search(&search)
        .await?;

    Ok(Json(products))
}

/// Decrement a product's stock for an order.
pub async fn decrement_on_order(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<ProductId>,
    Json(body): Json<DecrementRequest>,
) -> Result<impl IntoResponse> {
    let product = CatalogService::new(state.store(), state.mailer())
        .decrement_on_order(id, body.order_quantity)
        .await?;

    Ok(Json(product))
}
