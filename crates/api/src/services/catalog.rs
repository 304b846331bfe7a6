//! Catalog workflows: seller listings and the order-time stock decrement.
//!
//! Listings are soft-deleted, never dropped, and every read/list/search
//! excludes delisted products. The stock decrement is its own operation,
//! deliberately not invoked by order placement.

use palengke_core::{ProductId, UserId};

use crate::db::{ProductSearch, Store};
use crate::error::AppError;
use crate::models::{NewProduct, Product, ProductChanges, SellerIdentity};
use crate::services::email::{Mailer, notify};

/// Catalog service.
pub struct CatalogService<'a> {
    store: &'a dyn Store,
    mailer: &'a dyn Mailer,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a dyn Store, mailer: &'a dyn Mailer) -> Self {
        Self { store, mailer }
    }

    /// Create a listing for a seller, stamping the seller's identity onto
    /// it, and notify them.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for bad fields or an incomplete
    /// seller profile, `AppError::NotFound` if the seller doesn't exist.
    pub async fn create(&self, owner: UserId, input: NewProduct) -> Result<Product, AppError> {
        if input.name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        if input.quantity < 0 {
            return Err(AppError::Validation(
                "Quantity must not be negative".to_string(),
            ));
        }
        if input.unit_price.is_sign_negative() || input.unit_price.is_zero() {
            return Err(AppError::Validation(
                "Unit price must be greater than zero".to_string(),
            ));
        }

        let user = self
            .store
            .find_user(owner)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let seller = match (user.first_name, user.last_name, user.business_name) {
            (Some(first_name), Some(last_name), Some(business_name)) => SellerIdentity {
                first_name,
                last_name,
                business_name,
            },
            _ => {
                return Err(AppError::Validation(
                    "Seller profile is incomplete".to_string(),
                ));
            }
        };

        let name = input.name.clone();
        let product = self
            .store
            .create_product(Product::new(owner, seller, input))
            .await?;

        notify(
            self.mailer,
            user.email.as_str(),
            "Product Added Successfully",
            &format!("Product {name} has been added successfully."),
        )
        .await;

        Ok(product)
    }

    /// Update a listing in place; absent fields keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the listing is absent or
    /// soft-deleted, or the acting user doesn't exist.
    pub async fn update(
        &self,
        actor: UserId,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, AppError> {
        let mut product = self
            .store
            .find_product(id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let user = self
            .store
            .find_user(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        product.apply(changes);
        self.store.update_product(&product).await?;

        notify(
            self.mailer,
            user.email.as_str(),
            "Product Updated",
            &format!("Product {} has been updated.", product.name),
        )
        .await;

        Ok(product)
    }

    /// Soft-delete a listing. Delisted products stay in the store but
    /// disappear from every read, list and search.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the listing is absent or already
    /// soft-deleted, or the acting user doesn't exist.
    pub async fn soft_delete(&self, actor: UserId, id: ProductId) -> Result<(), AppError> {
        let mut product = self
            .store
            .find_product(id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let user = self
            .store
            .find_user(actor)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        product.is_deleted = true;
        self.store.update_product(&product).await?;

        notify(
            self.mailer,
            user.email.as_str(),
            "Product Deleted",
            &format!("Product {} has been deleted.", product.name),
        )
        .await;

        Ok(())
    }

    /// All live listings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.store.list_products().await?)
    }

    /// Live listings matching the search filters.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn search(&self, search: &ProductSearch) -> Result<Vec<Product>, AppError> {
        Ok(self.store.search_products(search).await?)
    }

    /// Decrement a product's stock for an order.
    ///
    /// This is an independently callable operation; order placement does
    /// NOT invoke it, so inventory only moves when a caller asks for it
    /// explicitly.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is absent or
    /// soft-deleted, `AppError::InsufficientQuantity` if stock is short.
    /// The stored quantity never goes negative.
    pub async fn decrement_on_order(
        &self,
        id: ProductId,
        order_quantity: i32,
    ) -> Result<Product, AppError> {
        if order_quantity < 1 {
            return Err(AppError::Validation(
                "Order quantity must be at least 1".to_string(),
            ));
        }

        let mut product = self
            .store
            .find_product(id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if product.quantity < order_quantity {
            return Err(AppError::InsufficientQuantity);
        }

        product.quantity -= order_quantity;
        self.store.update_product(&product).await?;

        Ok(product)
    }
}
