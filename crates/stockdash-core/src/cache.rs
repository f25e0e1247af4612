//! In-memory series cache keyed by [`QueryKey`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{QueryKey, Series};

/// Default lifetime of a cached series.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    series: Arc<Series>,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<QueryKey, CacheEntry>,
    ttl: Duration,
}

impl CacheInner {
    fn new(ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            ttl,
        }
    }

    fn get(&self, key: &QueryKey) -> Option<Arc<Series>> {
        self.map.get(key).and_then(|entry| {
            if Instant::now() < entry.expires_at {
                Some(Arc::clone(&entry.series))
            } else {
                None
            }
        })
    }

    /// Insert `series`, dropping entries that have already expired.
    fn put(&mut self, key: QueryKey, series: Arc<Series>) {
        self.clear_expired();
        let expires_at = Instant::now() + self.ttl;
        self.map.insert(key, CacheEntry { series, expires_at });
    }

    fn clear_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, entry| entry.expires_at > now);
        before - self.map.len()
    }
}

/// Thread-safe TTL cache of fetched series.
///
/// Each key is either absent or present-with-expiry. Writes overwrite, so
/// concurrent fetches of one key settle on the last writer.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(ttl))),
        }
    }

    /// A cache that never stores anything (TTL is zero).
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Series for `key` if present and not yet expired.
    pub async fn get(&self, key: &QueryKey) -> Option<Arc<Series>> {
        let store = self.inner.read().await;
        store.get(key)
    }

    /// Insert or overwrite the entry for `key`. No-op when disabled.
    pub async fn put(&self, key: QueryKey, series: Arc<Series>) {
        let mut store = self.inner.write().await;
        if store.ttl.is_zero() {
            return;
        }
        store.put(key, series);
    }

    /// Evict `key`; returns whether an entry (expired or not) was removed.
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        let mut store = self.inner.write().await;
        store.map.remove(key).is_some()
    }

    /// Drop expired entries; returns how many were removed.
    pub async fn clear_expired(&self) -> usize {
        let mut store = self.inner.write().await;
        store.clear_expired()
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    /// Number of entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn ttl(&self) -> Duration {
        self.inner.read().await.ttl
    }

    pub async fn is_disabled(&self) -> bool {
        self.ttl().await.is_zero()
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interval, Period};

    fn key(ticker: &str) -> QueryKey {
        QueryKey::parse(ticker, Period::OneMonth, Interval::OneDay).expect("valid key")
    }

    fn series(ticker: &str) -> Arc<Series> {
        Arc::new(Series::empty(key(ticker)))
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = SeriesCache::new(Duration::from_secs(1));

        assert!(cache.get(&key("MSFT")).await.is_none());

        let first = series("MSFT");
        cache.put(key("MSFT"), Arc::clone(&first)).await;
        let hit = cache.get(&key("MSFT")).await.expect("cache hit");
        assert!(Arc::ptr_eq(&hit, &first));

        let second = series("MSFT");
        cache.put(key("MSFT"), Arc::clone(&second)).await;
        let hit = cache.get(&key("MSFT")).await.expect("cache hit");
        assert!(Arc::ptr_eq(&hit, &second));
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = SeriesCache::new(Duration::from_millis(100));

        cache.put(key("MSFT"), series("MSFT")).await;
        assert!(cache.get(&key("MSFT")).await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get(&key("MSFT")).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_invalidate_single_key() {
        let cache = SeriesCache::default();

        cache.put(key("MSFT"), series("MSFT")).await;
        cache.put(key("AAPL"), series("AAPL")).await;

        assert!(cache.invalidate(&key("MSFT")).await);
        assert!(!cache.invalidate(&key("MSFT")).await);
        assert!(cache.get(&key("MSFT")).await.is_none());
        assert!(cache.get(&key("AAPL")).await.is_some());
    }

    #[tokio::test]
    async fn test_cache_keys_distinguish_period_and_interval() {
        let cache = SeriesCache::default();
        cache.put(key("MSFT"), series("MSFT")).await;

        let weekly = QueryKey::parse("MSFT", Period::OneMonth, Interval::OneWeek).expect("valid");
        assert!(cache.get(&weekly).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_clear_expired() {
        let cache = SeriesCache::new(Duration::from_millis(100));

        cache.put(key("MSFT"), series("MSFT")).await;
        cache.put(key("AAPL"), series("AAPL")).await;
        assert_eq!(cache.len().await, 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.clear_expired().await, 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_put_sweeps_expired_entries() {
        let cache = SeriesCache::new(Duration::from_millis(100));

        cache.put(key("MSFT"), series("MSFT")).await;
        cache.put(key("AAPL"), series("AAPL")).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        cache.put(key("NVDA"), series("NVDA")).await;
        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&key("NVDA")).await.is_some());
    }

    #[tokio::test]
    async fn test_cache_clear_all() {
        let cache = SeriesCache::default();

        cache.put(key("MSFT"), series("MSFT")).await;
        cache.put(key("AAPL"), series("AAPL")).await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_cache_disabled() {
        let cache = SeriesCache::disabled();

        assert!(cache.is_disabled().await);
        cache.put(key("MSFT"), series("MSFT")).await;
        assert!(cache.get(&key("MSFT")).await.is_none());
        assert_eq!(cache.len().await, 0);
    }
}
