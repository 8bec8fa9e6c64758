//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Performance counters and a live snapshot of the cache contents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of valid-entry retrievals
    pub hits: u64,
    /// Number of failed retrievals (absent or expired)
    pub misses: u64,
    /// Number of entries dropped by the size bound
    pub evictions: u64,
    /// Number of entries removed after their TTL elapsed
    pub expired: u64,
    /// Current number of valid entries
    pub size: usize,
    /// Keys of the currently valid entries
    pub keys: Vec<String>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recorders ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the eviction counter by `count`.
    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    /// Increments the expired counter by `count`.
    pub fn record_expired(&mut self, count: u64) {
        self.expired += count;
    }
}
