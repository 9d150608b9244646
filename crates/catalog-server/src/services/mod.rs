//! Command and query handlers behind the HTTP routes.
//!
//! Handlers return [`catalog_core::Outcome`]; the routes only translate it.

pub mod accounts;
pub mod products;

pub use accounts::{AccountService, AuthResponse};
pub use products::ProductService;

use catalog_core::Failure;

/// Runs CPU-bound work (credential hashing) on the blocking pool.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, Failure>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        tracing::error!(error = %e, "blocking task failed");
        Failure::internal("Internal server error")
    })
}
