//! Memoization cache for fingerprint-derived values
//!
//! Recomputing values derived from large collections (node-set fingerprints,
//! tag-drift comparisons) on every reconciliation pass is wasteful, so the
//! controller memoizes them keyed by canonical digest. The cache is an
//! explicitly constructed dependency injected into whichever components need
//! it; it has process lifetime, supports concurrent reads and writes, and
//! evicts by its configured capacity/TTL policy rather than by explicit
//! invalidation from the reconciliation core.

use std::time::Duration;

/// Eviction policy configuration for a [`FingerprintCache`]
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Maximum number of entries retained
    pub max_capacity: u64,
    /// Time after insertion at which an entry expires
    pub time_to_live: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 4096,
            time_to_live: Duration::from_secs(1800),
        }
    }
}

/// Concurrent capacity/TTL-bounded cache keyed by canonical digest
pub struct FingerprintCache<V: Clone + Send + Sync + 'static> {
    inner: moka::sync::Cache<String, V>,
}

impl<V: Clone + Send + Sync + 'static> FingerprintCache<V> {
    /// Create a cache with the given eviction policy
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: moka::sync::Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.time_to_live)
                .build(),
        }
    }

    /// Look up a memoized value by its digest
    pub fn get(&self, digest: &str) -> Option<V> {
        self.inner.get(digest)
    }

    /// Memoize a value under its digest
    pub fn insert(&self, digest: impl Into<String>, value: V) {
        self.inner.insert(digest.into(), value);
    }

    /// Look up a value, computing and memoizing it on miss
    ///
    /// Concurrent callers for the same digest compute at most once.
    pub fn get_or_compute(&self, digest: impl Into<String>, compute: impl FnOnce() -> V) -> V {
        self.inner.get_with(digest.into(), compute)
    }

    /// Drop a memoized value
    pub fn evict(&self, digest: &str) {
        self.inner.invalidate(digest);
    }

    /// Number of entries currently retained (approximate under concurrency)
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl<V: Clone + Send + Sync + 'static> Default for FingerprintCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
