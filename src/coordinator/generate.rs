//! Generation Coordinator
//!
//! The single entry point for "get or produce" of a scenario bundle:
//! cache check, per-entity coalescing, the external generation call,
//! persistence side effects and outcome caching. Failed generations are
//! cached alongside successful ones, so a failing or quota-exhausted
//! backend is not hammered within the TTL window.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ScenarioCache};
use crate::collab::{ScenarioGenerator, ScenarioStorage};
use crate::coordinator::{InFlight, SavedScenarioLoader};
use crate::error::{Result, ScenarioError};
use crate::models::{GenerationOutcome, Observation};

// == Generation State ==
/// Observable per-entity view of the generation side.
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    /// A generation is in flight
    pub loading: bool,
    /// Latest outcome, cached failures included
    pub outcome: Option<GenerationOutcome>,
    /// Fatal error of the last attempt that produced no outcome
    pub error: Option<String>,
}

// == Generation Coordinator ==
pub struct GenerationCoordinator {
    cache: Arc<RwLock<ScenarioCache<GenerationOutcome>>>,
    generator: Arc<dyn ScenarioGenerator>,
    storage: Arc<dyn ScenarioStorage>,
    saved: Arc<SavedScenarioLoader>,
    inflight: InFlight,
    states: RwLock<HashMap<String, GenerationState>>,
}

impl GenerationCoordinator {
    // == Constructor ==
    pub fn new(
        cache: Arc<RwLock<ScenarioCache<GenerationOutcome>>>,
        generator: Arc<dyn ScenarioGenerator>,
        storage: Arc<dyn ScenarioStorage>,
        saved: Arc<SavedScenarioLoader>,
    ) -> Self {
        Self {
            cache,
            generator,
            storage,
            saved,
            inflight: InFlight::new(),
            states: RwLock::new(HashMap::new()),
        }
    }

    // == Request Generation ==
    /// Returns the scenario outcome for a case, generating it if the
    /// cache has nothing valid for the entity + observation fingerprint.
    ///
    /// At most one generation per entity is in flight at any time;
    /// concurrent callers wait on the entity lock and pick the winner's
    /// outcome up from the cache. The external call is never cancelled
    /// once started, so an abandoned caller's result still lands in the
    /// cache for whoever asks next.
    pub async fn request_generation(
        &self,
        entity_id: &str,
        observations: &[Observation],
    ) -> Result<GenerationOutcome> {
        let key = { self.cache.read().await.key_for(entity_id, observations) };

        // Fast path: valid cached outcome, success or failure alike.
        if let Some(outcome) = self.cache.write().await.get(&key) {
            debug!(entity_id, %key, "generation cache hit");
            self.record_outcome(entity_id, &outcome).await;
            return Ok(outcome);
        }

        let _guard = self.inflight.acquire(entity_id).await;

        // A concurrent winner may have filled the cache while we waited.
        if let Some(outcome) = self.cache.write().await.get(&key) {
            debug!(entity_id, "generation resolved by concurrent caller");
            self.record_outcome(entity_id, &outcome).await;
            return Ok(outcome);
        }

        // Fail fast on missing configuration; not cached, so fixing the
        // configuration takes effect immediately.
        if !self.generator.is_configured() {
            let err =
                ScenarioError::NotConfigured("generation backend is not configured".to_string());
            self.record_error(entity_id, err.to_string()).await;
            return Err(err);
        }

        self.set_loading(entity_id, true).await;
        let outcome = self.generate_and_persist(entity_id, observations).await;
        self.set_loading(entity_id, false).await;

        self.cache.write().await.set(key, outcome.clone());
        self.record_outcome(entity_id, &outcome).await;
        Ok(outcome)
    }

    // == Generate And Persist ==
    /// Runs the external generation call and its persistence side
    /// effect. Persistence failure is non-fatal: the generated bundle is
    /// still returned and cached, with the save error surfaced as a
    /// secondary field. Never returns an error; every path folds into an
    /// outcome.
    async fn generate_and_persist(
        &self,
        entity_id: &str,
        observations: &[Observation],
    ) -> GenerationOutcome {
        match self.generator.generate(entity_id, observations).await {
            Ok(bundle) => match self.storage.save(entity_id, &bundle).await {
                Ok(persisted_id) => {
                    info!(entity_id, %persisted_id, "scenario bundle generated and saved");
                    // A new saved record exists now; refresh the saved view.
                    self.saved.invalidate(entity_id).await;
                    if let Err(err) = self.saved.refresh(entity_id).await {
                        warn!(entity_id, error = %err, "saved refresh after persist failed");
                    }
                    GenerationOutcome::saved(bundle, persisted_id)
                }
                Err(err) => {
                    warn!(entity_id, error = %err, "bundle generated but save failed");
                    GenerationOutcome::unsaved(bundle, err.to_string())
                }
            },
            Err(err) => {
                warn!(entity_id, error = %err, "scenario generation failed");
                GenerationOutcome::failed(err.to_string())
            }
        }
    }

    // == Invalidate ==
    /// Drops every generated-cache entry of the entity and resets its
    /// observable state. Returns the number of cache entries removed.
    pub async fn invalidate(&self, entity_id: &str) -> usize {
        let removed = self.cache.write().await.invalidate(entity_id);
        self.states.write().await.remove(entity_id);
        self.inflight.prune(entity_id);
        removed
    }

    // == State ==
    /// Observable state snapshot for an entity.
    pub async fn state(&self, entity_id: &str) -> GenerationState {
        self.states
            .read()
            .await
            .get(entity_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the entity already has an outcome or a generation in
    /// flight; the preloader checks this before triggering.
    pub async fn has_result_or_loading(&self, entity_id: &str) -> bool {
        if self.inflight.is_held(entity_id) {
            return true;
        }
        let states = self.states.read().await;
        states
            .get(entity_id)
            .map(|state| state.loading || state.outcome.is_some())
            .unwrap_or(false)
    }

    /// Statistics of the generated-outcome cache.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.write().await.stats()
    }

    /// The saved-results loader sharing this coordinator's entity view.
    pub fn saved(&self) -> &Arc<SavedScenarioLoader> {
        &self.saved
    }

    // == State Recording ==
    async fn set_loading(&self, entity_id: &str, loading: bool) {
        let mut states = self.states.write().await;
        states.entry(entity_id.to_string()).or_default().loading = loading;
    }

    async fn record_outcome(&self, entity_id: &str, outcome: &GenerationOutcome) {
        let mut states = self.states.write().await;
        let state = states.entry(entity_id.to_string()).or_default();
        state.outcome = Some(outcome.clone());
        state.error = if outcome.success {
            None
        } else {
            outcome.error.clone()
        };
    }

    async fn record_error(&self, entity_id: &str, error: String) {
        let mut states = self.states.write().await;
        states.entry(entity_id.to_string()).or_default().error = Some(error);
    }
}
