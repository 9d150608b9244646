//! Cache backend: per-process DashMap or shared Redis.

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::pattern::glob_to_regex;

/// Keys deleted per `DEL` command during pattern removal.
const DELETE_BATCH: usize = 256;

/// Entry cap of the local backend unless configured otherwise.
pub const DEFAULT_LOCAL_MAX_ENTRIES: usize = 10_000;

/// A cached entry with optional TTL.
///
/// The data is wrapped in `Arc` so hits hand out a reference instead of a copy.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Option<Duration>,
}

impl CachedEntry {
    pub fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Entries without a TTL never expire.
    pub fn is_expired(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.cached_at.elapsed() >= ttl)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache {operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("invalid key pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Byte-level cache backend.
///
/// ## Cache Modes
///
/// - **Local**: single-instance mode using only DashMap
/// - **Redis**: shared mode, every instance reads and writes the same Redis
///
/// Redis operations, including acquiring a pooled connection, are bounded by
/// `op_timeout`. Local operations never fail except for invalid patterns.
///
/// The local map holds at most `max_entries` keys. When it is full, expired
/// entries are swept first; if it is still full the new key is not cached.
#[derive(Clone)]
pub enum CacheBackend {
    /// Single-instance: local DashMap only
    Local {
        entries: Arc<DashMap<String, CachedEntry>>,
        max_entries: usize,
    },

    /// Multi-instance: Redis
    Redis { pool: Pool, op_timeout: Duration },
}

impl std::fmt::Debug for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local {
                entries,
                max_entries,
            } => f
                .debug_struct("Local")
                .field("len", &entries.len())
                .field("max_entries", max_entries)
                .finish(),
            Self::Redis { op_timeout, .. } => f
                .debug_struct("Redis")
                .field("op_timeout", op_timeout)
                .finish_non_exhaustive(),
        }
    }
}

impl CacheBackend {
    /// Create a new local-only cache backend with the default entry cap.
    pub fn new_local() -> Self {
        Self::new_local_bounded(DEFAULT_LOCAL_MAX_ENTRIES)
    }

    /// Create a new local-only cache backend holding at most `max_entries` keys.
    pub fn new_local_bounded(max_entries: usize) -> Self {
        CacheBackend::Local {
            entries: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    /// Create a new Redis-backed cache backend.
    pub fn new_redis(pool: Pool, op_timeout: Duration) -> Self {
        CacheBackend::Redis { pool, op_timeout }
    }

    /// `"local"` or `"redis"`.
    pub fn mode(&self) -> &'static str {
        match self {
            CacheBackend::Local { .. } => "local",
            CacheBackend::Redis { .. } => "redis",
        }
    }

    /// Reads a value. Expired and absent entries are both `Ok(None)`.
    pub async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, CacheError> {
        match self {
            CacheBackend::Local { entries: map, .. } => {
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        return Ok(Some(Arc::clone(&entry.data)));
                    }
                    // Remove expired entry
                    drop(entry);
                    map.remove_if(key, |_, e| e.is_expired());
                }
                Ok(None)
            }
            CacheBackend::Redis { pool, op_timeout } => {
                bounded("get", *op_timeout, async {
                    let mut conn = pool.get().await?;
                    let data: Option<Vec<u8>> = conn.get(key).await?;
                    Ok(data.map(Arc::new))
                })
                .await
            }
        }
    }

    /// Writes a value, replacing any previous one.
    ///
    /// On Redis this is a single `SET` (or `PSETEX` when a TTL is given), so a
    /// write either lands completely or not at all.
    pub async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        match self {
            CacheBackend::Local {
                entries: map,
                max_entries,
            } => {
                if map.len() >= *max_entries && !map.contains_key(key) {
                    let removed = cleanup_expired(map);
                    tracing::debug!(removed, "expired local cache entries swept");

                    if map.len() >= *max_entries {
                        tracing::warn!(
                            max_entries = *max_entries,
                            key = %key,
                            "local cache at capacity, skipping insertion"
                        );
                        return Ok(());
                    }
                }
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
                Ok(())
            }
            CacheBackend::Redis { pool, op_timeout } => {
                bounded("set", *op_timeout, async {
                    let mut conn = pool.get().await?;
                    match ttl.map(ttl_millis) {
                        Some(ttl_ms) => conn.pset_ex::<_, _, ()>(key, value, ttl_ms).await?,
                        None => conn.set::<_, _, ()>(key, value).await?,
                    }
                    tracing::debug!(key = %key, ttl = ?ttl, "cache set (redis)");
                    Ok(())
                })
                .await
            }
        }
    }

    /// Deletes a key. Returns whether something was removed.
    pub async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        match self {
            CacheBackend::Local { entries: map, .. } => Ok(map.remove(key).is_some()),
            CacheBackend::Redis { pool, op_timeout } => {
                bounded("remove", *op_timeout, async {
                    let mut conn = pool.get().await?;
                    let removed: usize = conn.del(key).await?;
                    Ok(removed > 0)
                })
                .await
            }
        }
    }

    /// Deletes every key matching a glob pattern and returns how many were
    /// removed.
    ///
    /// Keys are enumerated first (`SCAN MATCH` on Redis) and then deleted in
    /// batches, so a key written between the two steps can survive.
    pub async fn remove_by_pattern(&self, pattern: &str) -> Result<usize, CacheError> {
        match self {
            CacheBackend::Local { entries: map, .. } => {
                let re = glob_to_regex(pattern)?;
                let mut removed = 0;
                map.retain(|key, _| {
                    let hit = re.is_match(key);
                    if hit {
                        removed += 1;
                    }
                    !hit
                });
                Ok(removed)
            }
            CacheBackend::Redis { pool, op_timeout } => {
                bounded("remove_by_pattern", *op_timeout, async {
                    let mut conn = pool.get().await?;
                    let keys: Vec<String> = {
                        let mut iter = conn.scan_match::<_, String>(pattern).await?;
                        let mut keys = Vec::new();
                        while let Some(key) = iter.next_item().await {
                            keys.push(key);
                        }
                        keys
                    };

                    let mut removed = 0;
                    for chunk in keys.chunks(DELETE_BATCH) {
                        let n: usize = conn.del(chunk).await?;
                        removed += n;
                    }
                    Ok(removed)
                })
                .await
            }
        }
    }

    /// Whether a live entry exists for `key`.
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match self {
            CacheBackend::Local { entries: map, .. } => {
                Ok(map.get(key).is_some_and(|e| !e.is_expired()))
            }
            CacheBackend::Redis { pool, op_timeout } => {
                bounded("exists", *op_timeout, async {
                    let mut conn = pool.get().await?;
                    let found: bool = conn.exists(key).await?;
                    Ok(found)
                })
                .await
            }
        }
    }

    /// Get cache statistics. Entry counts are only known in local mode.
    pub fn stats(&self) -> CacheStats {
        match self {
            CacheBackend::Local { entries: map, .. } => CacheStats {
                local_entries: Some(map.len()),
                mode: self.mode(),
            },
            CacheBackend::Redis { .. } => CacheStats {
                local_entries: None,
                mode: self.mode(),
            },
        }
    }

    /// Check if Redis is available (for health checks).
    pub async fn is_redis_available(&self) -> bool {
        match self {
            CacheBackend::Local { .. } => false,
            CacheBackend::Redis { pool, op_timeout } => {
                bounded("ping", *op_timeout, async {
                    let mut conn = pool.get().await?;
                    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
                    Ok(())
                })
                .await
                .is_ok()
            }
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub local_entries: Option<usize>,
    pub mode: &'static str,
}

/// Drops every expired entry and returns how many were removed.
fn cleanup_expired(map: &DashMap<String, CachedEntry>) -> usize {
    let before = map.len();
    map.retain(|_, entry| !entry.is_expired());
    before.saturating_sub(map.len())
}

/// `PSETEX` takes whole milliseconds and rejects zero.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

async fn bounded<T, F>(operation: &'static str, timeout: Duration, fut: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, CacheError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout { operation, timeout }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_set_get_remove() {
        let cache = CacheBackend::new_local();
        assert!(cache.get("k").await.unwrap().is_none());

        cache.set("k", b"v".to_vec(), None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().unwrap().as_slice(), b"v");
        assert!(cache.exists("k").await.unwrap());

        assert!(cache.remove("k").await.unwrap());
        assert!(!cache.remove("k").await.unwrap());
        assert!(!cache.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_entries_expire() {
        let cache = CacheBackend::new_local();
        cache
            .set("short", b"v".to_vec(), Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.exists("short").await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get("short").await.unwrap().is_none());
        assert!(!cache.exists("short").await.unwrap());
        assert_eq!(cache.stats().local_entries, Some(0));
    }

    #[tokio::test]
    async fn test_local_pattern_removal() {
        let cache = CacheBackend::new_local();
        for key in ["products:all:::1:10", "products:owner:1", "product:1"] {
            cache.set(key, b"x".to_vec(), None).await.unwrap();
        }

        let removed = cache.remove_by_pattern("products:*").await.unwrap();
        assert_eq!(removed, 2);
        assert!(cache.exists("product:1").await.unwrap());
        assert_eq!(cache.remove_by_pattern("products:*").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_local_capacity_sweeps_expired_entries() {
        let cache = CacheBackend::new_local_bounded(100);
        for i in 0..100 {
            cache
                .set(
                    &format!("products:all::search-{i}:1:10"),
                    b"[]".to_vec(),
                    Some(Duration::from_millis(1)),
                )
                .await
                .unwrap();
        }
        assert_eq!(cache.stats().local_entries, Some(100));

        tokio::time::sleep(Duration::from_millis(20)).await;
        cache
            .set("products:all::fresh:1:10", b"[]".to_vec(), None)
            .await
            .unwrap();
        assert_eq!(cache.stats().local_entries, Some(1));
        assert!(cache.exists("products:all::fresh:1:10").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_capacity_skips_when_full_of_live_entries() {
        let cache = CacheBackend::new_local_bounded(2);
        cache.set("a", b"1".to_vec(), None).await.unwrap();
        cache.set("b", b"2".to_vec(), None).await.unwrap();

        cache.set("c", b"3".to_vec(), None).await.unwrap();
        assert!(!cache.exists("c").await.unwrap());
        assert_eq!(cache.stats().local_entries, Some(2));

        // Existing keys can still be replaced at capacity
        cache.set("a", b"9".to_vec(), None).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap().unwrap().as_slice(), b"9");
    }

    #[test]
    fn test_ttl_millis() {
        assert_eq!(ttl_millis(Duration::from_secs(2)), 2000);
        assert_eq!(ttl_millis(Duration::from_micros(10)), 1);
        assert_eq!(ttl_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_stats_and_mode() {
        let cache = CacheBackend::new_local();
        let stats = cache.stats();
        assert_eq!(stats.mode, "local");
        assert_eq!(stats.local_entries, Some(0));
        assert_eq!(cache.mode(), "local");
    }
}
