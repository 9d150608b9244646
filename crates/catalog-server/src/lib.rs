//! HTTP server for the product catalog API.
//!
//! Wires the record store, credential hasher, token service and cache into
//! an axum router. See [`server::build_app`] for the assembly order.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

pub use cache::{CacheBackend, CacheStore};
pub use config::{AppConfig, CacheConfig, RedisConfig};
pub use error::ServerError;
pub use server::{AppState, CatalogServer, ServerBuilder, build_app, router};

/// Create a cache backend based on configuration.
///
/// If Redis is disabled, cannot be configured, or does not answer within
/// `redis.timeout_ms`, this returns a local-only backend capped at
/// `cache.max_entries`.
pub async fn create_cache_backend(config: &RedisConfig, cache: &CacheConfig) -> CacheBackend {
    let local = || CacheBackend::new_local_bounded(cache.max_entries);

    if !config.enabled {
        tracing::info!("Redis disabled, using local cache only");
        return local();
    }

    tracing::info!(url = %config.url, "Connecting to Redis");

    let timeout = config.timeout();
    let mut pool_config = deadpool_redis::PoolConfig::new(config.pool_size);
    pool_config.timeouts.wait = Some(timeout);
    pool_config.timeouts.create = Some(timeout);
    pool_config.timeouts.recycle = Some(timeout);

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    redis_config.pool = Some(pool_config);

    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to create Redis pool. Falling back to local cache."
            );
            return local();
        }
    };

    // Test connection
    let backend = CacheBackend::new_redis(pool, timeout);
    if backend.is_redis_available().await {
        tracing::info!("Connected to Redis");
        backend
    } else {
        tracing::warn!("Failed to connect to Redis. Falling back to local cache.");
        local()
    }
}
