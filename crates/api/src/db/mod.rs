//! Storage port and backends.
//!
//! Every workflow talks to the store through the traits below rather than a
//! concrete database handle, so production wires in [`postgres::PgStore`]
//! while tests substitute [`memory::MemoryStore`]. One collection per
//! entity, each record keyed by an opaque generated identifier; all writes
//! are atomic at single-record granularity only.
//!
//! # Tables (Postgres backend)
//!
//! - `users` - accounts, credentials, profile, verification state
//! - `products` - seller listings (soft-deleted, never dropped)
//! - `carts` - one row per user (`UNIQUE (user_id)`), JSONB line items
//! - `orders` - immutable snapshots, JSONB line items
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p palengke-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use palengke_core::{Email, ProductId, UserId};

use crate::models::{Cart, Order, Product, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Case-insensitive substring filters for the product search. Absent
/// fields don't constrain the result; present fields are OR-combined.
#[derive(Debug, Clone, Default)]
pub struct ProductSearch {
    pub category: Option<String>,
    pub name: Option<String>,
    pub business_name: Option<String>,
}

impl ProductSearch {
    /// Whether any filter was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none() && self.name.is_none() && self.business_name.is_none()
    }
}

/// User records.
///
/// Lookups return soft-deleted users too; callers decide whether the
/// deletion flag matters (login refuses them, account deletion reads them).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    async fn create_user(&self, user: User) -> Result<User, RepositoryError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Persist changed fields of an existing user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    async fn update_user(&self, user: &User) -> Result<(), RepositoryError>;
}

/// Product listings.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Look up a listing by ID, soft-deleted ones included (order and cart
    /// views still resolve products that were delisted after the fact).
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Persist changed fields of an existing listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist.
    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// All listings that are not soft-deleted.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Non-deleted listings matching the search filters.
    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<Product>, RepositoryError>;
}

/// Carts. At most one per user, enforced by a unique owner key, so writes
/// go through an owner-keyed upsert rather than find-then-insert.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_cart_by_owner(&self, owner: UserId) -> Result<Option<Cart>, RepositoryError>;

    /// Insert the cart, or replace the line items of the owner's existing
    /// cart if one is already present.
    async fn upsert_cart(&self, cart: &Cart) -> Result<(), RepositoryError>;

    /// Delete the owner's cart wholesale. Returns whether a cart existed.
    async fn delete_cart_by_owner(&self, owner: UserId) -> Result<bool, RepositoryError>;
}

/// Orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, order: Order) -> Result<Order, RepositoryError>;

    async fn list_orders_by_owner(&self, owner: UserId) -> Result<Vec<Order>, RepositoryError>;
}

/// The full storage handle workflows are given.
#[async_trait]
pub trait Store: UserStore + ProductStore + CartStore + OrderStore {
    /// Readiness probe. Fails when the backing store is unreachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
