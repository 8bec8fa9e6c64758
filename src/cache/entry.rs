//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL metadata.

// == Cache Entry ==
/// A single cached payload with its insertion time and time-to-live.
///
/// An entry is valid as long as `now - stored_at <= ttl_ms`; once the TTL
/// has fully elapsed the entry must never be returned to a caller.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the supplied current time.
    pub fn new(data: T, ttl_ms: u64, now_ms: u64) -> Self {
        Self {
            data,
            stored_at: now_ms,
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL.
    ///
    /// Boundary condition: an entry inserted with `ttl_ms = 1000` is still
    /// valid at `now - stored_at == 1000` and expired at `1001`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at) > self.ttl_ms
    }

    // == Remaining TTL ==
    /// Returns the remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        let deadline = self.stored_at.saturating_add(self.ttl_ms);
        deadline.saturating_sub(now_ms)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_valid_before_ttl() {
        let entry = CacheEntry::new("payload", 1_000, 10_000);
        assert!(!entry.is_expired(10_000));
        assert!(!entry.is_expired(10_999));
    }

    #[test]
    fn test_entry_valid_at_exact_ttl_boundary() {
        let entry = CacheEntry::new("payload", 1_000, 10_000);
        assert!(!entry.is_expired(11_000));
    }

    #[test]
    fn test_entry_expired_past_ttl() {
        let entry = CacheEntry::new("payload", 1_000, 10_000);
        assert!(entry.is_expired(11_001));
    }

    #[test]
    fn test_entry_clock_skew_does_not_panic() {
        // A clock that moved backwards must not underflow.
        let entry = CacheEntry::new("payload", 1_000, 10_000);
        assert!(!entry.is_expired(9_000));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("payload", 1_000, 10_000);
        assert_eq!(entry.ttl_remaining_ms(10_000), 1_000);
        assert_eq!(entry.ttl_remaining_ms(10_400), 600);
        assert_eq!(entry.ttl_remaining_ms(11_000), 0);
        assert_eq!(entry.ttl_remaining_ms(12_000), 0);
    }
}
