//! Product listing domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use palengke_core::{Category, ProductId, UserId};

/// A product listing owned by exactly one seller.
///
/// The seller's name and business name are denormalized onto the listing at
/// creation time (search matches on business name without a join).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// Owning seller.
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
    pub name: String,
    /// Units in stock. Never negative; checked before every decrement.
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    /// Relative path of the uploaded image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub date_of_upload: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Seller identity denormalized onto a listing.
#[derive(Debug, Clone)]
pub struct SellerIdentity {
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
}

/// Validated input for creating a listing.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub description: Option<String>,
    pub category: Category,
    pub image: Option<String>,
}

/// Partial update for a listing. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub image: Option<String>,
}

impl Product {
    /// Create a fresh listing for a seller.
    #[must_use]
    pub fn new(owner_id: UserId, seller: SellerIdentity, input: NewProduct) -> Self {
        Self {
            id: ProductId::generate(),
            owner_id,
            first_name: seller.first_name,
            last_name: seller.last_name,
            business_name: seller.business_name,
            name: input.name,
            quantity: input.quantity,
            unit_price: input.unit_price,
            description: input.description,
            category: input.category,
            image: input.image,
            date_of_upload: Utc::now(),
            is_deleted: false,
        }
    }

    /// Apply a partial update, keeping stored values for absent fields.
    pub fn apply(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_price) = changes.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(image) = changes.image {
            self.image = Some(image);
        }
    }
}
