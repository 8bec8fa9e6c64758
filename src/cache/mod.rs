//! Cache Module
//!
//! In-memory caching for scenario data with TTL expiration, size-bound
//! eviction and entity-scoped invalidation.

mod clock;
mod entry;
pub mod key;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ScenarioCache;

// == Public Constants ==
/// Default maximum number of entries per cache instance
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Namespace of the generated-outcome cache
pub const GENERATED_NAMESPACE: &str = "generated";

/// Namespace of the saved-record cache
pub const SAVED_NAMESPACE: &str = "saved";
