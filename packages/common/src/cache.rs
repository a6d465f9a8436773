//! Keyed, tagged cache for content queries.
//!
//! Entries are stored as JSON values under a composite key and carry a set of
//! tags. Invalidating a tag drops every entry that carries it, so the next
//! read recomputes from the source.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Composite cache key, e.g. `["service", "topographic-survey"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

/// Tagged cache storage.
#[async_trait]
pub trait TagCache: Send + Sync {
    /// Fetch a live (non-expired) entry.
    async fn get(&self, key: &CacheKey) -> Option<serde_json::Value>;

    /// Store an entry with a time-to-live and a set of tags.
    async fn put(&self, key: CacheKey, value: serde_json::Value, ttl: Duration, tags: Vec<String>);

    /// Drop every entry carrying `tag`. Returns the number of entries dropped.
    async fn invalidate(&self, tag: &str) -> usize;
}

/// Extension trait for typed, compute-on-miss access.
/// Automatically implemented for any T that implements TagCache.
#[async_trait]
pub trait TagCacheExt: TagCache {
    /// Return the cached value for `key`, or run `compute` and cache its `Ok` result.
    ///
    /// Errors from `compute` are returned as-is and never cached. A cached value
    /// that no longer deserializes into `T` counts as a miss.
    async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: CacheKey,
        ttl: Duration,
        tags: Vec<String>,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send,
        E: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        if let Some(cached) = self.get(&key).await {
            match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(key = %key, error = %e, "Discarding undecodable cache entry"),
            }
        }

        debug!(key = %key, "Cache miss");
        let value = compute().await?;

        match serde_json::to_value(&value) {
            Ok(json) => self.put(key, json, ttl, tags).await,
            Err(e) => warn!(key = %key, error = %e, "Value not cacheable"),
        }

        Ok(value)
    }
}

// Blanket implementation
impl<T: ?Sized + TagCache> TagCacheExt for T {}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
    tags: Vec<String>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local [`TagCache`]. Expired entries are dropped lazily on read
/// and eagerly by [`MemoryCache::purge_expired`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all expired entries. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TagCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let now = Instant::now();
        let live = self
            .entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.value.clone()))?;
        if live.is_none() {
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        }
        live
    }

    async fn put(&self, key: CacheKey, value: serde_json::Value, ttl: Duration, tags: Vec<String>) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
            tags,
        };
        self.entries.insert(key, entry);
    }

    async fn invalidate(&self, tag: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        before - self.entries.len()
    }
}
