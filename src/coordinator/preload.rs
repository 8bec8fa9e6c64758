//! Viewport-Proximity Preloader
//!
//! Turns proximity signals from the UI layer into opportunistic
//! background generations, so the result is usually ready before the
//! user reaches the scenario control. Purely an optimization: disabling
//! it only affects perceived latency, never correctness, and redundant
//! triggers are harmless thanks to the coordinator's coalescing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::coordinator::GenerationCoordinator;
use crate::models::Observation;

// == Proximity Preloader ==
pub struct ProximityPreloader {
    coordinator: Arc<GenerationCoordinator>,
    /// Trigger distance from the viewport's bottom edge, in pixels
    threshold_px: u32,
    /// Entities already preloaded; cleared on invalidation
    fired: Mutex<HashSet<String>>,
}

impl ProximityPreloader {
    // == Constructor ==
    pub fn new(coordinator: Arc<GenerationCoordinator>, threshold_px: u32) -> Self {
        Self {
            coordinator,
            threshold_px,
            fired: Mutex::new(HashSet::new()),
        }
    }

    // == Observe ==
    /// Handles one proximity signal. Fires a background generation when
    /// the trigger element is within the threshold and the entity has no
    /// result or in-flight generation yet. Returns whether a generation
    /// was started.
    ///
    /// Errors of the spawned generation are logged and swallowed; a
    /// preload runs outside any user-initiated action and must never
    /// surface failures.
    pub async fn observe(
        &self,
        entity_id: &str,
        distance_px: u32,
        observations: Vec<Observation>,
    ) -> bool {
        if distance_px > self.threshold_px {
            return false;
        }

        if self.coordinator.has_result_or_loading(entity_id).await {
            return false;
        }

        {
            let mut fired = self.fired.lock().expect("preload set poisoned");
            if !fired.insert(entity_id.to_string()) {
                return false;
            }
        }

        debug!(entity_id, distance_px, "preloading scenario generation");
        let coordinator = Arc::clone(&self.coordinator);
        let entity = entity_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = coordinator.request_generation(&entity, &observations).await {
                debug!(entity_id = %entity, error = %err, "preload generation skipped");
            }
        });

        true
    }

    // == Reset ==
    /// Allows the entity to be preloaded again, e.g. after its cache
    /// entries were invalidated.
    pub fn reset(&self, entity_id: &str) {
        self.fired
            .lock()
            .expect("preload set poisoned")
            .remove(entity_id);
    }
}
