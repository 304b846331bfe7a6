//! In-memory store backend.
//!
//! Backs the workflow and router tests so they run without a database.
//! Keys and uniqueness constraints mirror the SQL schema: users keyed by
//! ID with a unique email, carts unique per owner.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use palengke_core::{Email, ProductId, UserId};

use crate::models::{Cart, Order, Product, User};

use super::{
    CartStore, OrderStore, ProductSearch, ProductStore, RepositoryError, Store, UserStore,
};

/// A `HashMap`-backed [`Store`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    products: RwLock<HashMap<ProductId, Product>>,
    carts: RwLock<HashMap<UserId, Cart>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, product: Product) -> Result<Product, RepositoryError> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        match products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| !p.is_deleted)
            .cloned()
            .collect();
        products.sort_by_key(|p| p.date_of_upload);
        Ok(products)
    }

    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<Product>, RepositoryError> {
        let matches_filter = |field: &str, filter: &Option<String>| {
            filter
                .as_ref()
                .is_some_and(|f| field.to_lowercase().contains(&f.to_lowercase()))
        };

        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| !p.is_deleted)
            .filter(|p| {
                search.is_empty()
                    || matches_filter(p.category.as_str(), &search.category)
                    || matches_filter(&p.name, &search.name)
                    || matches_filter(&p.business_name, &search.business_name)
            })
            .cloned()
            .collect();
        products.sort_by_key(|p| p.date_of_upload);
        Ok(products)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_cart_by_owner(&self, owner: UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self.carts.read().await.get(&owner).cloned())
    }

    async fn upsert_cart(&self, cart: &Cart) -> Result<(), RepositoryError> {
        self.carts.write().await.insert(cart.user_id, cart.clone());
        Ok(())
    }

    async fn delete_cart_by_owner(&self, owner: UserId) -> Result<bool, RepositoryError> {
        Ok(self.carts.write().await.remove(&owner).is_some())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: Order) -> Result<Order, RepositoryError> {
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn list_orders_by_owner(&self, owner: UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.user_id == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
