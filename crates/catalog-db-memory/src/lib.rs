//! In-memory storage backend for the catalog API.
//!
//! This crate implements the `UserStorage` and `ProductStorage` traits from
//! `catalog-storage`. Products live in a papaya lock-free HashMap; users sit
//! behind a tokio `RwLock` so the email index stays consistent with the rows.
//!
//! # Example
//!
//! ```ignore
//! use catalog_db_memory::InMemoryStore;
//! use catalog_storage::UserStorage;
//!
//! let store = InMemoryStore::new();
//! let user = catalog_core::User::new("a@b.com", digest, "Ada", "Lovelace", Default::default());
//! let saved = store.add(user).await?;
//! assert_eq!(saved.id, 1);
//! ```

pub mod storage;

pub use catalog_storage::{ProductFilter, ProductStorage, StorageError, UserStorage};
pub use storage::InMemoryStore;

/// Type alias for a shareable store instance.
pub type SharedStore = std::sync::Arc<InMemoryStore>;

/// Creates a new, empty in-memory store.
pub fn create_store() -> SharedStore {
    std::sync::Arc::new(InMemoryStore::new())
}
