//! In-process implementation of [`UserStore`].
//!
//! All tables live behind one `RwLock`, so uniqueness checks and the write
//! they guard happen atomically. Data is lost when the process exits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use accounts_core::{CartId, Email, UserId};

use super::{StoreError, UserStore};
use crate::models::{Cart, NewUserRecord, User, UserChangesRecord, UserWithCarts};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, StoredUser>,
    carts: BTreeMap<CartId, Cart>,
    last_user_id: i32,
    last_cart_id: i32,
}

impl Tables {
    fn carts_for(&self, user_id: UserId) -> Vec<Cart> {
        self.carts
            .values()
            .filter(|cart| cart.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Reject `username`/`email` values already held by a user other than `except`.
    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&Email>,
        except: Option<UserId>,
    ) -> Result<(), StoreError> {
        let others = self
            .users
            .values()
            .filter(|stored| Some(stored.user.id) != except);

        for stored in others {
            if username.is_some_and(|u| stored.user.username == u) {
                return Err(StoreError::Conflict { field: "username" });
            }
            if email.is_some_and(|e| stored.user.email == *e) {
                return Err(StoreError::Conflict { field: "email" });
            }
        }

        Ok(())
    }
}

/// User store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
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
    async fn list_users(&self) -> Result<Vec<UserWithCarts>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .users
            .values()
            .map(|stored| UserWithCarts {
                user: stored.user.clone(),
                carts: tables.carts_for(stored.user.id),
            })
            .collect())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserWithCarts>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables.users.get(&id).map(|stored| UserWithCarts {
            user: stored.user.clone(),
            carts: tables.carts_for(id),
        }))
    }

    async fn get_credentials(&self, email: &Email) -> Result<Option<(User, String)>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .users
            .values()
            .find(|stored| stored.user.email == *email)
            .map(|stored| (stored.user.clone(), stored.password_hash.clone())))
    }

    async fn insert_user(&self, record: NewUserRecord) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        tables.check_unique(Some(&record.username), Some(&record.email), None)?;

        if let Some(cart_id) = record.cart_id
            && !tables.carts.contains_key(&cart_id)
        {
            return Err(StoreError::MissingReference { field: "cart_id" });
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(tables.last_user_id),
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            balance: record.balance,
            cart_id: record.cart_id,
            created_at: now,
            updated_at: now,
        };

        tables.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: record.password_hash,
            },
        );

        Ok(user)
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: UserChangesRecord,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&id) {
            return Ok(None);
        }

        tables.check_unique(None, changes.email.as_ref(), Some(id))?;

        let Some(stored) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(first_name) = changes.first_name {
            stored.user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            stored.user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            stored.user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            stored.password_hash = password_hash;
        }
        stored.user.updated_at = Utc::now();

        Ok(Some(stored.user.clone()))
    }

    async fn delete_user(&self, id: UserId) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(0);
        }

        let removed: Vec<CartId> = tables
            .carts
            .values()
            .filter(|cart| cart.user_id == id)
            .map(|cart| cart.id)
            .collect();
        tables.carts.retain(|_, cart| cart.user_id != id);

        for stored in tables.users.values_mut() {
            if stored.user.cart_id.is_some_and(|cart| removed.contains(&cart)) {
                stored.user.cart_id = None;
            }
        }

        Ok(1)
    }

    async fn list_carts(&self, user_id: UserId) -> Result<Vec<Cart>, StoreError> {
        Ok(self.tables.read().await.carts_for(user_id))
    }

    async fn create_cart(&self, user_id: UserId) -> Result<Cart, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::MissingReference { field: "user_id" });
        }

        tables.last_cart_id += 1;
        let cart = Cart {
            id: CartId::new(tables.last_cart_id),
            user_id,
            created_at: Utc::now(),
        };
        tables.carts.insert(cart.id, cart.clone());

        Ok(cart)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
