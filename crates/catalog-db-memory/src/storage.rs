use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use catalog_core::{Product, User};
use catalog_storage::{ProductFilter, ProductStorage, StorageError, UserStorage};
use papaya::HashMap as PapayaHashMap;
use tokio::sync::RwLock;

/// Rows plus the lowercase email index, guarded together.
#[derive(Debug, Default)]
struct UserTable {
    rows: HashMap<i64, User>,
    by_email: HashMap<String, i64>,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// In-process record store.
///
/// Ids are assigned from per-table atomic sequences starting at 1. Records
/// are cloned in and out; callers never hold references into the tables.
#[derive(Debug)]
pub struct InMemoryStore {
    users: RwLock<UserTable>,
    products: PapayaHashMap<i64, Product>,
    user_seq: AtomicI64,
    product_seq: AtomicI64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(UserTable::default()),
            products: PapayaHashMap::new(),
            user_seq: AtomicI64::new(1),
            product_seq: AtomicI64::new(1),
        }
    }

    /// Number of stored users, deleted ones included.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.rows.len()
    }

    /// Number of stored products, deleted ones included.
    pub fn product_count(&self) -> usize {
        self.products.pin().len()
    }
}

#[async_trait]
impl UserStorage for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let table = self.users.read().await;
        Ok(table
            .by_email
            .get(&email_key(email))
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StorageError> {
        Ok(self
            .users
            .read()
            .await
            .by_email
            .contains_key(&email_key(email)))
    }

    async fn add(&self, mut user: User) -> Result<User, StorageError> {
        let key = email_key(&user.email);
        let mut table = self.users.write().await;
        if table.by_email.contains_key(&key) {
            return Err(StorageError::already_exists("user", user.email));
        }

        user.id = self.user_seq.fetch_add(1, Ordering::SeqCst);
        table.by_email.insert(key, user.id);
        table.rows.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, "user stored");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, StorageError> {
        let mut table = self.users.write().await;
        let previous_key = match table.rows.get(&user.id) {
            Some(existing) => email_key(&existing.email),
            None => return Err(StorageError::not_found("user", user.id)),
        };

        let key = email_key(&user.email);
        if key != previous_key {
            if table.by_email.contains_key(&key) {
                return Err(StorageError::already_exists("user", user.email));
            }
            table.by_email.remove(&previous_key);
            table.by_email.insert(key, user.id);
        }

        table.rows.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProductStorage for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StorageError> {
        Ok(self.products.pin().get(&id).cloned())
    }

    async fn add(&self, mut product: Product) -> Result<Product, StorageError> {
        product.id = self.product_seq.fetch_add(1, Ordering::SeqCst);
        self.products.pin().insert(product.id, product.clone());
        tracing::debug!(product_id = product.id, owner = product.user_id, "product stored");
        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Product, StorageError> {
        let guard = self.products.pin();
        if guard.get(&product.id).is_none() {
            return Err(StorageError::not_found("product", product.id));
        }
        guard.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StorageError> {
        let guard = self.products.pin();
        let mut matching: Vec<Product> = guard
            .iter()
            .filter(|(_, product)| filter.matches(product))
            .map(|(_, product)| product.clone())
            .collect();
        matching.sort_by_key(|product| product.id);

        Ok(matching
            .into_iter()
            .skip(filter.offset())
            .take(filter.page_size as usize)
            .collect())
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Product>, StorageError> {
        let guard = self.products.pin();
        let mut owned: Vec<Product> = guard
            .iter()
            .filter(|(_, product)| product.user_id == user_id && !product.is_deleted)
            .map(|(_, product)| product.clone())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }
}
