//! Typed cache-aside facade.
//!
//! Values are stored as JSON text. Every fault (transport, timeout, bad
//! payload) is logged, counted, and turned into a miss or a no-op: callers
//! fall back to the record store and never see a cache error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::backend::{CacheBackend, CacheStats};
use crate::metrics;

#[derive(Debug, Clone)]
pub struct CacheStore {
    backend: CacheBackend,
}

impl CacheStore {
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend }
    }

    /// Process-local store, mostly for tests.
    pub fn local() -> Self {
        Self::new(CacheBackend::new_local())
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    pub fn mode(&self) -> &'static str {
        self.backend.mode()
    }

    pub fn stats(&self) -> CacheStats {
        self.backend.stats()
    }

    /// Returns the cached value, or `None` on absence, expiry or any fault.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(key = %key, "cache miss");
                metrics::record_cache_miss(self.mode());
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed");
                metrics::record_cache_error("get");
                metrics::record_cache_miss(self.mode());
                return None;
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                tracing::debug!(key = %key, "cache hit");
                metrics::record_cache_hit(self.mode());
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cached value could not be decoded");
                metrics::record_cache_error("decode");
                metrics::record_cache_miss(self.mode());
                None
            }
        }
    }

    /// Stores `value` under `key`. `None` TTL means no expiry.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "value could not be encoded for cache");
                metrics::record_cache_error("encode");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, bytes, ttl).await {
            tracing::warn!(key = %key, error = %e, "cache write failed");
            metrics::record_cache_error("set");
        }
    }

    /// Removes `key`. An absent key is not an error.
    pub async fn remove(&self, key: &str) {
        match self.backend.remove(key).await {
            Ok(removed) => {
                tracing::debug!(key = %key, removed, "cache key removed");
                if removed {
                    metrics::record_cache_invalidation("key", 1);
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache remove failed");
                metrics::record_cache_error("remove");
            }
        }
    }

    /// Removes every key matching the glob `pattern`.
    pub async fn remove_by_pattern(&self, pattern: &str) {
        match self.backend.remove_by_pattern(pattern).await {
            Ok(removed) => {
                tracing::debug!(pattern = %pattern, removed, "cache pattern removed");
                metrics::record_cache_invalidation("pattern", removed);
            }
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "cache pattern remove failed");
                metrics::record_cache_error("remove_by_pattern");
            }
        }
    }

    /// Whether a live entry exists. Faults read as `false`.
    pub async fn exists(&self, key: &str) -> bool {
        match self.backend.exists(key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache exists check failed");
                metrics::record_cache_error("exists");
                false
            }
        }
    }
}
