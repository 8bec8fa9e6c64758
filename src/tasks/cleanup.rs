//! Cache Sweep Task
//!
//! Background task that periodically evicts expired entries from both
//! cache instances. The caches already clean themselves opportunistically
//! on every read and write; this sweep only bounds how long an idle
//! entry can linger between requests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ScenarioCache;
use crate::models::{GenerationOutcome, SavedScenarioRecord};

/// Spawns the periodic sweep over the generated and saved caches.
///
/// Returns a JoinHandle used to abort the task during graceful shutdown.
pub fn spawn_cleanup_task(
    generated: Arc<RwLock<ScenarioCache<GenerationOutcome>>>,
    saved: Arc<RwLock<ScenarioCache<Vec<SavedScenarioRecord>>>>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed_generated = { generated.write().await.cleanup() };
            let removed_saved = { saved.write().await.cleanup() };

            let removed = removed_generated + removed_saved;
            if removed > 0 {
                info!(
                    removed_generated,
                    removed_saved, "cache sweep removed entries"
                );
            } else {
                debug!("cache sweep found nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{GENERATED_NAMESPACE, SAVED_NAMESPACE};
    use crate::models::GenerationOutcome;

    fn caches() -> (
        Arc<RwLock<ScenarioCache<GenerationOutcome>>>,
        Arc<RwLock<ScenarioCache<Vec<SavedScenarioRecord>>>>,
    ) {
        (
            Arc::new(RwLock::new(ScenarioCache::new(
                GENERATED_NAMESPACE,
                100,
                1_800_000,
            ))),
            Arc::new(RwLock::new(ScenarioCache::new(
                SAVED_NAMESPACE,
                100,
                300_000,
            ))),
        )
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let (generated, saved) = caches();

        {
            let mut cache = generated.write().await;
            cache.set_with_ttl(
                "generated:case-1:default",
                GenerationOutcome::failed("old".to_string()),
                100,
            );
        }

        let handle = spawn_cleanup_task(Arc::clone(&generated), saved, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(generated.read().await.is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_valid_entries() {
        let (generated, saved) = caches();

        {
            let mut cache = generated.write().await;
            cache.set(
                "generated:case-1:default",
                GenerationOutcome::failed("fresh".to_string()),
            );
        }

        let handle = spawn_cleanup_task(Arc::clone(&generated), saved, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(generated.read().await.len(), 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_can_be_aborted() {
        let (generated, saved) = caches();
        let handle = spawn_cleanup_task(generated, saved, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished());
    }
}
