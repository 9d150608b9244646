//! # catalog-storage
//!
//! Durable record store contracts for the catalog API.
//!
//! This crate defines the traits that storage backends implement for users
//! and products. It contains no implementation; see `catalog-db-memory` for
//! the in-process backend.
//!
//! The store is the source of truth. Callers consult the cache first, fall
//! back here on a miss, and send every mutation here before invalidating
//! cached copies.
//!
//! ## Example
//!
//! ```ignore
//! use catalog_storage::{ProductFilter, ProductStorage, StorageError};
//!
//! async fn first_page(store: &dyn ProductStorage) -> Result<usize, StorageError> {
//!     let page = store.list(&ProductFilter::default()).await?;
//!     Ok(page.len())
//! }
//! ```

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::{ProductStorage, UserStorage};
pub use types::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ProductFilter};
