//! In-Flight Table
//!
//! Per-entity request coalescing. The first caller for an entity holds
//! the entity's lock for the duration of its collaborator call; late
//! callers block on the same lock, then find the finished result in the
//! cache on their post-acquire re-check. This keeps the hard invariant
//! of at most one in-flight call per entity while letting concurrent
//! callers observe the same eventual result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

// == In-Flight Table ==
/// Lazily grown map of per-entity async locks.
#[derive(Default)]
pub struct InFlight {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InFlight {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the entity's lock, creating it on first use. The guard
    /// releases on drop, on every exit path.
    pub async fn acquire(&self, entity_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("in-flight table poisoned");
            Arc::clone(
                locks
                    .entry(entity_id.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Whether a call for the entity is currently in flight.
    pub fn is_held(&self, entity_id: &str) -> bool {
        let locks = self.locks.lock().expect("in-flight table poisoned");
        match locks.get(entity_id) {
            Some(lock) => lock.try_lock().is_err(),
            None => false,
        }
    }

    /// Drops the entity's lock entry if no call currently holds it, so
    /// the table does not grow for the process lifetime. A held lock is
    /// left in place; `acquire` recreates pruned entries on demand.
    pub fn prune(&self, entity_id: &str) {
        let mut locks = self.locks.lock().expect("in-flight table poisoned");
        let idle = locks
            .get(entity_id)
            .map(|lock| lock.try_lock().is_ok())
            .unwrap_or(false);
        if idle {
            locks.remove(entity_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().expect("in-flight table poisoned").len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_is_exclusive_per_entity() {
        let table = Arc::new(InFlight::new());

        let guard = table.acquire("case-1").await;
        assert!(table.is_held("case-1"));
        assert!(!table.is_held("case-2"));

        drop(guard);
        assert!(!table.is_held("case-1"));
    }

    #[tokio::test]
    async fn test_late_caller_waits_for_release() {
        let table = Arc::new(InFlight::new());
        let guard = table.acquire("case-1").await;

        let waiter = {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                let _guard = table.acquire("case-1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should proceed after release")
            .unwrap();
    }

    #[tokio::test]
    async fn test_entities_are_independent() {
        let table = InFlight::new();
        let _one = table.acquire("case-1").await;
        // Must not deadlock.
        let _two = table.acquire("case-2").await;
    }

    #[tokio::test]
    async fn test_prune_removes_idle_entry_only() {
        let table = InFlight::new();

        let guard = table.acquire("case-1").await;
        table.prune("case-1");
        assert_eq!(table.len(), 1);
        assert!(table.is_held("case-1"));

        drop(guard);
        table.prune("case-1");
        assert_eq!(table.len(), 0);

        // Pruned entries come back on the next acquire.
        let _guard = table.acquire("case-1").await;
        assert!(table.is_held("case-1"));
    }
}
