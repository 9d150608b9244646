//! Storage traits for the catalog record store.
//!
//! Lookups return `Ok(None)` for missing records; errors are reserved for
//! writes against absent rows, uniqueness violations and infrastructure
//! faults.

use async_trait::async_trait;
use catalog_core::{Product, User};

use crate::error::StorageError;
use crate::types::ProductFilter;

/// Account records.
///
/// # Example
///
/// ```ignore
/// use catalog_storage::{StorageError, UserStorage};
///
/// async fn require(store: &dyn UserStorage, id: i64) -> Result<catalog_core::User, StorageError> {
///     store
///         .find_by_id(id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("user", id))
/// }
/// ```
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Reads a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;

    /// Reads a user by email, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Whether any user (deleted or not) holds `email`.
    async fn exists_by_email(&self, email: &str) -> Result<bool, StorageError>;

    /// Inserts a user and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the email is taken.
    async fn add(&self, user: User) -> Result<User, StorageError>;

    /// Replaces a stored user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no user has `user.id`.
    async fn update(&self, user: User) -> Result<User, StorageError>;
}

/// Product records.
#[async_trait]
pub trait ProductStorage: Send + Sync {
    /// Reads a product by id, including soft-deleted rows.
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StorageError>;

    /// Inserts a product and returns it with its assigned id.
    async fn add(&self, product: Product) -> Result<Product, StorageError>;

    /// Replaces a stored product.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no product has `product.id`.
    async fn update(&self, product: Product) -> Result<Product, StorageError>;

    /// One page of listed (active, non-deleted) products matching `filter`,
    /// in insertion order.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StorageError>;

    /// Every non-deleted product owned by `user_id`, newest first.
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Product>, StorageError>;
}
