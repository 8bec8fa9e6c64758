//! Cache Store Module
//!
//! Generic namespaced in-memory store with TTL expiration and a
//! size-bound eviction pass. Two instances back the subsystem: a
//! long-TTL store for generated scenario outcomes and a short-TTL store
//! for saved records.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::key::{build_key, entity_prefix};
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::models::Observation;

// == Scenario Cache ==
/// In-memory `key -> CacheEntry<T>` store.
///
/// Lookups never fail: an absent or expired entry simply reads as a
/// miss, forcing the caller back to the authoritative collaborator.
/// The eviction pass runs opportunistically on every `get`/`set`.
#[derive(Debug)]
pub struct ScenarioCache<T: Clone> {
    /// Namespace prefixed to every key of this instance
    namespace: String,
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries retained after cleanup
    max_entries: usize,
    /// TTL applied by `set`, in milliseconds
    default_ttl_ms: u64,
    /// Time source, injectable for tests
    clock: Arc<dyn Clock>,
}

impl<T: Clone> ScenarioCache<T> {
    // == Constructors ==
    /// Creates a cache with the system clock.
    pub fn new(namespace: impl Into<String>, max_entries: usize, default_ttl_ms: u64) -> Self {
        Self::with_clock(namespace, max_entries, default_ttl_ms, Arc::new(SystemClock))
    }

    /// Creates a cache with an explicit time source.
    pub fn with_clock(
        namespace: impl Into<String>,
        max_entries: usize,
        default_ttl_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl_ms,
            clock,
        }
    }

    // == Key For ==
    /// Builds this instance's namespaced key for an entity and its
    /// observation set.
    pub fn key_for(&self, entity_id: &str, observations: &[Observation]) -> String {
        build_key(&self.namespace, entity_id, observations)
    }

    // == Get ==
    /// Returns a clone of the cached data if present and within TTL.
    ///
    /// Runs a cleanup pass first, so an expired entry can never be
    /// observed. A valid hit has no side effect beyond the hit counter.
    pub fn get(&mut self, key: &str) -> Option<T> {
        self.cleanup();

        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.data.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Inserts or overwrites an entry with the default TTL.
    pub fn set(&mut self, key: impl Into<String>, data: T) {
        let ttl = self.default_ttl_ms;
        self.set_with_ttl(key, data, ttl);
    }

    /// Inserts or overwrites an entry with an explicit TTL, then runs
    /// the cleanup pass.
    pub fn set_with_ttl(&mut self, key: impl Into<String>, data: T, ttl_ms: u64) {
        let entry = CacheEntry::new(data, ttl_ms, self.clock.now_ms());
        self.entries.insert(key.into(), entry);
        self.cleanup();
    }

    // == Invalidate ==
    /// Removes every entry keyed under `entity_id` in this namespace,
    /// across all fingerprints. Returns the number removed.
    pub fn invalidate(&mut self, entity_id: &str) -> usize {
        let prefix = entity_prefix(&self.namespace, entity_id);
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(&prefix));
        before - self.entries.len()
    }

    // == Clear ==
    /// Removes all entries unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Stats ==
    /// Returns counters plus a snapshot of the currently valid keys,
    /// taken after a cleanup pass.
    pub fn stats(&mut self) -> CacheStats {
        self.cleanup();

        let mut stats = self.stats.clone();
        stats.size = self.entries.len();
        stats.keys = self.entries.keys().cloned().collect();
        stats.keys.sort();
        stats
    }

    // == Cleanup ==
    /// Eviction pass: drop expired entries first, then enforce the size
    /// bound by dropping the oldest remaining entries. Returns the total
    /// number removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();

        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let expired = before - self.entries.len();
        self.stats.record_expired(expired as u64);

        let mut evicted = 0;
        if self.entries.len() > self.max_entries {
            let mut by_age: Vec<(String, u64)> = self
                .entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.stored_at))
                .collect();
            by_age.sort_by_key(|(_, stored_at)| *stored_at);

            let excess = self.entries.len() - self.max_entries;
            for (key, _) in by_age.into_iter().take(excess) {
                self.entries.remove(&key);
                evicted += 1;
            }
            self.stats.record_evictions(evicted as u64);
        }

        expired + evicted
    }

    // == Length ==
    /// Returns the current number of entries, including any not yet
    /// swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn test_cache(max_entries: usize, ttl_ms: u64) -> (ScenarioCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache = ScenarioCache::with_clock("generated", max_entries, ttl_ms, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_and_get() {
        let (mut cache, _clock) = test_cache(100, 60_000);

        cache.set("generated:case-1:default", "bundle".to_string());
        assert_eq!(
            cache.get("generated:case-1:default"),
            Some("bundle".to_string())
        );
    }

    #[test]
    fn test_get_absent_is_miss() {
        let (mut cache, _clock) = test_cache(100, 60_000);
        assert_eq!(cache.get("generated:nope:default"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_ttl_expiry_against_manual_clock() {
        let (mut cache, clock) = test_cache(100, 60_000);

        cache.set_with_ttl("generated:case-1:default", "bundle".to_string(), 1_000);

        clock.advance(1_000);
        assert!(cache.get("generated:case-1:default").is_some());

        clock.advance(1);
        assert!(cache.get("generated:case-1:default").is_none());
    }

    #[test]
    fn test_overwrite_resets_timestamp() {
        let (mut cache, clock) = test_cache(100, 1_000);

        cache.set("generated:case-1:default", "old".to_string());
        clock.advance(800);
        cache.set("generated:case-1:default", "new".to_string());
        clock.advance(800);

        // 1600ms after the first insert, but only 800ms after the overwrite.
        assert_eq!(
            cache.get("generated:case-1:default"),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_size_bound_keeps_newest() {
        let (mut cache, clock) = test_cache(3, 60_000);

        for i in 0..5 {
            cache.set(format!("generated:case-{i}:default"), format!("v{i}"));
            clock.advance(10);
        }

        assert_eq!(cache.len(), 3);
        assert!(cache.get("generated:case-0:default").is_none());
        assert!(cache.get("generated:case-1:default").is_none());
        assert!(cache.get("generated:case-2:default").is_some());
        assert!(cache.get("generated:case-3:default").is_some());
        assert!(cache.get("generated:case-4:default").is_some());
    }

    #[test]
    fn test_invalidate_scoped_to_entity() {
        let (mut cache, _clock) = test_cache(100, 60_000);

        cache.set("generated:case-1:fpA", "a".to_string());
        cache.set("generated:case-1:fpB", "b".to_string());
        cache.set("generated:case-2:fpA", "c".to_string());

        let removed = cache.invalidate("case-1");
        assert_eq!(removed, 2);
        assert!(cache.get("generated:case-1:fpA").is_none());
        assert!(cache.get("generated:case-1:fpB").is_none());
        assert!(cache.get("generated:case-2:fpA").is_some());
    }

    #[test]
    fn test_invalidate_does_not_touch_prefix_sharing_entities() {
        let (mut cache, _clock) = test_cache(100, 60_000);

        cache.set("generated:case-1:fpA", "a".to_string());
        cache.set("generated:case-10:fpA", "b".to_string());

        cache.invalidate("case-1");
        assert!(cache.get("generated:case-10:fpA").is_some());
    }

    #[test]
    fn test_clear() {
        let (mut cache, _clock) = test_cache(100, 60_000);

        cache.set("generated:case-1:default", "a".to_string());
        cache.set("generated:case-2:default", "b".to_string());
        cache.clear();

        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_reports_valid_keys_only() {
        let (mut cache, clock) = test_cache(100, 60_000);

        cache.set_with_ttl("generated:case-1:default", "a".to_string(), 1_000);
        cache.set_with_ttl("generated:case-2:default", "b".to_string(), 10_000);

        clock.advance(2_000);

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.keys, vec!["generated:case-2:default".to_string()]);
        assert_eq!(stats.expired, 1);
    }

    #[test]
    fn test_key_for_uses_namespace() {
        let (cache, _clock) = test_cache(100, 60_000);
        let key = cache.key_for("case-42", &[]);
        assert_eq!(key, "generated:case-42:default");
    }
}
