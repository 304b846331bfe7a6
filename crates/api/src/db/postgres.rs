//! `PostgreSQL` store backend.
//!
//! Queries are bound at runtime (`sqlx::query_as`) against the schema in
//! `crates/api/migrations/`. Cart and order line items live in a JSONB
//! column, so each cart/order record reads and writes as one document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use palengke_core::{
    CartId, Category, Email, OrderId, OrderStatus, PaymentStatus, ProductId, Role, UserId,
};

use crate::models::{Cart, LineItem, Order, Product, User};

use super::{
    CartStore, OrderStore, ProductSearch, ProductStore, RepositoryError, Store, UserStore,
};

/// `PostgreSQL`-backed [`Store`] implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (readiness checks, tests).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// =============================================================================
// Row types
// =============================================================================

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    is_deleted: bool,
    first_name: Option<String>,
    last_name: Option<String>,
    contact_number: Option<String>,
    address: Option<String>,
    role: Option<String>,
    business_name: Option<String>,
    is_email_verified: bool,
    email_verification_token: Option<String>,
    registration_date: DateTime<Utc>,
}

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    user_id: Uuid,
    first_name: String,
    last_name: String,
    business_name: String,
    name: String,
    quantity: i32,
    unit_price: Decimal,
    description: Option<String>,
    category: String,
    image: Option<String>,
    date_of_upload: DateTime<Utc>,
    is_deleted: bool,
}

#[derive(FromRow)]
struct CartRow {
    id: Uuid,
    user_id: Uuid,
    items: Json<Vec<LineItem>>,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    items: Json<Vec<LineItem>>,
    total_amount: Decimal,
    payment_status: String,
    order_status: String,
    created_at: DateTime<Utc>,
}

fn user_from_row(r: UserRow) -> Result<User, RepositoryError> {
    let email = Email::parse(&r.email)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;
    let role = r
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(RepositoryError::DataCorruption)?;

    Ok(User {
        id: UserId::from_uuid(r.id),
        email,
        password_hash: r.password_hash,
        is_deleted: r.is_deleted,
        first_name: r.first_name,
        last_name: r.last_name,
        contact_number: r.contact_number,
        address: r.address,
        role,
        business_name: r.business_name,
        is_email_verified: r.is_email_verified,
        email_verification_token: r.email_verification_token,
        registration_date: r.registration_date,
    })
}

fn product_from_row(r: ProductRow) -> Result<Product, RepositoryError> {
    let category = r
        .category
        .parse::<Category>()
        .map_err(RepositoryError::DataCorruption)?;

    Ok(Product {
        id: ProductId::from_uuid(r.id),
        owner_id: UserId::from_uuid(r.user_id),
        first_name: r.first_name,
        last_name: r.last_name,
        business_name: r.business_name,
        name: r.name,
        quantity: r.quantity,
        unit_price: r.unit_price,
        description: r.description,
        category,
        image: r.image,
        date_of_upload: r.date_of_upload,
        is_deleted: r.is_deleted,
    })
}

fn cart_from_row(r: CartRow) -> Cart {
    Cart {
        id: CartId::from_uuid(r.id),
        user_id: UserId::from_uuid(r.user_id),
        items: r.items.0,
        created_at: r.created_at,
    }
}

fn order_from_row(r: OrderRow) -> Result<Order, RepositoryError> {
    let payment_status = match r.payment_status.as_str() {
        "Pending" => PaymentStatus::Pending,
        "Completed" => PaymentStatus::Completed,
        "Failed" => PaymentStatus::Failed,
        other => {
            return Err(RepositoryError::DataCorruption(format!(
                "invalid payment status: {other}"
            )));
        }
    };
    let order_status = match r.order_status.as_str() {
        "Processing" => OrderStatus::Processing,
        "Shipped" => OrderStatus::Shipped,
        "Delivered" => OrderStatus::Delivered,
        "Cancelled" => OrderStatus::Cancelled,
        other => {
            return Err(RepositoryError::DataCorruption(format!(
                "invalid order status: {other}"
            )));
        }
    };

    Ok(Order {
        id: OrderId::from_uuid(r.id),
        user_id: UserId::from_uuid(r.user_id),
        items: r.items.0,
        total_amount: r.total_amount,
        payment_status,
        order_status,
        created_at: r.created_at,
    })
}

// =============================================================================
// Store implementations
// =============================================================================

const USER_COLUMNS: &str = "id, email, password_hash, is_deleted, first_name, last_name, \
     contact_number, address, role, business_name, is_email_verified, \
     email_verification_token, registration_date";

const PRODUCT_COLUMNS: &str = "id, user_id, first_name, last_name, business_name, name, \
     quantity, unit_price, description, category, image, date_of_upload, is_deleted";

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: User) -> Result<User, RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, is_deleted, is_email_verified, \
             email_verification_token, registration_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.is_deleted)
        .bind(user.is_email_verified)
        .bind(&user.email_verification_token)
        .bind(user.registration_date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET email = $2, password_hash = $3, is_deleted = $4, \
             first_name = $5, last_name = $6, contact_number = $7, address = $8, \
             role = $9, business_name = $10, is_email_verified = $11, \
             email_verification_token = $12 \
             WHERE id = $1",
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.is_deleted)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.contact_number)
        .bind(&user.address)
        .bind(user.role.map(|r| r.to_string()))
        .bind(&user.business_name)
        .bind(user.is_email_verified)
        .bind(&user.email_verification_token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn create_product(&self, product: Product) -> Result<Product, RepositoryError> {
        sqlx::query(
            "INSERT INTO products (id, user_id, first_name, last_name, business_name, name, \
             quantity, unit_price, description, category, image, date_of_upload, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(product.id.as_uuid())
        .bind(product.owner_id.as_uuid())
        .bind(&product.first_name)
        .bind(&product.last_name)
        .bind(&product.business_name)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.unit_price)
        .bind(&product.description)
        .bind(product.category.as_str())
        .bind(&product.image)
        .bind(product.date_of_upload)
        .bind(product.is_deleted)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(product_from_row).transpose()
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, quantity = $3, unit_price = $4, description = $5, \
             category = $6, image = $7, is_deleted = $8 \
             WHERE id = $1",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.unit_price)
        .bind(&product.description)
        .bind(product.category.as_str())
        .bind(&product.image)
        .bind(product.is_deleted)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_deleted = FALSE \
             ORDER BY date_of_upload"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(product_from_row).collect()
    }

    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_deleted = FALSE"
        ));

        let filters = [
            ("category", &search.category),
            ("name", &search.name),
            ("business_name", &search.business_name),
        ];

        let mut first = true;
        for (column, value) in filters {
            if let Some(value) = value {
                qb.push(if first { " AND (" } else { " OR " });
                first = false;
                qb.push(column)
                    .push(" ILIKE ")
                    .push_bind(format!("%{value}%"));
            }
        }
        if !first {
            qb.push(")");
        }
        qb.push(" ORDER BY date_of_upload");

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(product_from_row).collect()
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn find_cart_by_owner(&self, owner: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, items, created_at FROM carts WHERE user_id = $1",
        )
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(cart_from_row))
    }

    async fn upsert_cart(&self, cart: &Cart) -> Result<(), RepositoryError> {
        // The unique index on user_id makes lazy creation race-free: two
        // concurrent first adds both land on the same row.
        sqlx::query(
            "INSERT INTO carts (id, user_id, items, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET items = EXCLUDED.items",
        )
        .bind(cart.id.as_uuid())
        .bind(cart.user_id.as_uuid())
        .bind(Json(&cart.items))
        .bind(cart.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_cart_by_owner(&self, owner: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, order: Order) -> Result<Order, RepositoryError> {
        sqlx::query(
            "INSERT INTO orders (id, user_id, items, total_amount, payment_status, \
             order_status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(Json(&order.items))
        .bind(order.total_amount)
        .bind(order.payment_status.to_string())
        .bind(order.order_status.to_string())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list_orders_by_owner(&self, owner: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, items, total_amount, payment_status, order_status, created_at \
             FROM orders WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(order_from_row).collect()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
