//! Saved-Results Loader
//!
//! Fetches previously persisted scenario records for a case through the
//! short-TTL "saved" cache, coalescing concurrent loads per entity.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::ScenarioCache;
use crate::collab::ScenarioStorage;
use crate::coordinator::InFlight;
use crate::error::{Result, ScenarioError};
use crate::models::SavedScenarioRecord;

// == Saved State ==
/// Observable per-entity view of the saved records.
#[derive(Debug, Clone, Default)]
pub struct SavedState {
    /// A load is in flight
    pub loading: bool,
    /// Most recently loaded records
    pub records: Vec<SavedScenarioRecord>,
    /// Display-only error of the last failed load
    pub error: Option<String>,
}

// == Saved Scenario Loader ==
/// Cache-fronted reader of persisted scenario records.
pub struct SavedScenarioLoader {
    cache: Arc<RwLock<ScenarioCache<Vec<SavedScenarioRecord>>>>,
    storage: Arc<dyn ScenarioStorage>,
    inflight: InFlight,
    states: RwLock<HashMap<String, SavedState>>,
}

impl SavedScenarioLoader {
    // == Constructor ==
    pub fn new(
        cache: Arc<RwLock<ScenarioCache<Vec<SavedScenarioRecord>>>>,
        storage: Arc<dyn ScenarioStorage>,
    ) -> Self {
        Self {
            cache,
            storage,
            inflight: InFlight::new(),
            states: RwLock::new(HashMap::new()),
        }
    }

    // == Refresh ==
    /// Returns the saved records for a case, from cache when possible.
    ///
    /// On a miss, concurrent refreshes for the same entity collapse to a
    /// single storage read; late callers pick the result up from the
    /// cache after the winner releases the entity lock. A failed load is
    /// surfaced as `LoadFailed` and recorded display-only in the state.
    pub async fn refresh(&self, entity_id: &str) -> Result<Vec<SavedScenarioRecord>> {
        let key = { self.cache.read().await.key_for(entity_id, &[]) };

        if let Some(records) = self.cache.write().await.get(&key) {
            debug!(entity_id, count = records.len(), "saved cache hit");
            self.record_records(entity_id, records.clone()).await;
            return Ok(records);
        }

        let _guard = self.inflight.acquire(entity_id).await;

        if let Some(records) = self.cache.write().await.get(&key) {
            debug!(entity_id, "saved load resolved by concurrent caller");
            self.record_records(entity_id, records.clone()).await;
            return Ok(records);
        }

        self.set_loading(entity_id, true).await;
        let result = self.storage.load_saved(entity_id).await;
        self.set_loading(entity_id, false).await;

        match result {
            Ok(records) => {
                self.cache.write().await.set(key, records.clone());
                self.record_records(entity_id, records.clone()).await;
                Ok(records)
            }
            Err(err) => {
                let err = match err {
                    load @ ScenarioError::LoadFailed(_) => load,
                    other => ScenarioError::LoadFailed(other.to_string()),
                };
                self.record_error(entity_id, err.to_string()).await;
                Err(err)
            }
        }
    }

    // == Invalidate ==
    /// Drops the entity's saved-cache entries and resets its observable
    /// state, forcing the next refresh back to storage. Called after a
    /// successful generation-and-persist and after explicit user edits
    /// or deletes of a saved record.
    pub async fn invalidate(&self, entity_id: &str) -> usize {
        let removed = self.cache.write().await.invalidate(entity_id);
        self.states.write().await.remove(entity_id);
        self.inflight.prune(entity_id);
        removed
    }

    // == State ==
    /// Observable state snapshot for an entity.
    pub async fn state(&self, entity_id: &str) -> SavedState {
        self.states
            .read()
            .await
            .get(entity_id)
            .cloned()
            .unwrap_or_default()
    }

    // == State Recording ==
    async fn set_loading(&self, entity_id: &str, loading: bool) {
        let mut states = self.states.write().await;
        states.entry(entity_id.to_string()).or_default().loading = loading;
    }

    async fn record_records(&self, entity_id: &str, records: Vec<SavedScenarioRecord>) {
        let mut states = self.states.write().await;
        let state = states.entry(entity_id.to_string()).or_default();
        state.records = records;
        state.error = None;
    }

    async fn record_error(&self, entity_id: &str, error: String) {
        let mut states = self.states.write().await;
        states.entry(entity_id.to_string()).or_default().error = Some(error);
    }
}
