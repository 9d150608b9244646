//! Cache-aside layer for product reads.
//!
//! - `backend`: raw byte storage, local (DashMap) or Redis
//! - `store`: typed JSON facade that never surfaces cache faults
//! - `keys`: key conventions shared by readers and invalidators
//! - `pattern`: glob matching used by pattern removal in local mode

pub mod backend;
pub mod keys;
pub mod pattern;
pub mod store;

pub use backend::{CacheBackend, CacheError, CacheStats, CachedEntry};
pub use keys::{PRODUCTS_PATTERN, owner_products_key, product_key, products_list_key};
pub use store::CacheStore;
