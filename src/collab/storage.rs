//! Persistence Collaborator
//!
//! Trait boundary for the managed backend that stores scenario bundles,
//! with an HTTP implementation and an in-memory one. The in-memory
//! storage backs local runs without a configured backend and doubles as
//! the stub used by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{Result, ScenarioError};
use crate::models::{SavedScenarioRecord, ScenarioBundle};

// == Constants ==
/// Serialization schema version written into new records.
pub const SCHEMA_VERSION: u32 = 1;

// == Storage Trait ==
/// External persistence collaborator for scenario bundles.
#[async_trait]
pub trait ScenarioStorage: Send + Sync {
    /// Persists a bundle for a case and returns the assigned record id.
    async fn save(&self, entity_id: &str, bundle: &ScenarioBundle) -> Result<String>;

    /// Loads all previously persisted records for a case, newest first.
    async fn load_saved(&self, entity_id: &str) -> Result<Vec<SavedScenarioRecord>>;
}

// == HTTP Implementation ==
/// Storage backed by the managed backend's REST API.
pub struct HttpScenarioStorage {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

/// Wire request for saving a bundle.
#[derive(Debug, Serialize)]
struct SaveApiRequest<'a> {
    bundle: &'a ScenarioBundle,
    generated_at: chrono::DateTime<Utc>,
    model: &'a str,
    schema_version: u32,
}

/// Wire response carrying the assigned record id.
#[derive(Debug, Deserialize)]
struct SaveApiResponse {
    id: String,
}

impl HttpScenarioStorage {
    /// Creates a storage client for the given backend base URL.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn scenarios_url(&self, entity_id: &str) -> String {
        format!(
            "{}/cases/{}/scenarios",
            self.base_url.trim_end_matches('/'),
            entity_id
        )
    }
}

#[async_trait]
impl ScenarioStorage for HttpScenarioStorage {
    async fn save(&self, entity_id: &str, bundle: &ScenarioBundle) -> Result<String> {
        let request = SaveApiRequest {
            bundle,
            generated_at: Utc::now(),
            model: &self.model,
            schema_version: SCHEMA_VERSION,
        };

        let response: anyhow::Result<SaveApiResponse> = async {
            self.client
                .post(self.scenarios_url(entity_id))
                .json(&request)
                .send()
                .await
                .context("save request failed")?
                .error_for_status()
                .context("backend rejected the save")?
                .json()
                .await
                .context("malformed save response")
        }
        .await;

        response
            .map(|resp| resp.id)
            .map_err(|err| ScenarioError::PersistenceFailed(format!("{err:#}")))
    }

    async fn load_saved(&self, entity_id: &str) -> Result<Vec<SavedScenarioRecord>> {
        let records: anyhow::Result<Vec<SavedScenarioRecord>> = async {
            self.client
                .get(self.scenarios_url(entity_id))
                .send()
                .await
                .context("load request failed")?
                .error_for_status()
                .context("backend rejected the load")?
                .json()
                .await
                .context("malformed load response")
        }
        .await;

        records.map_err(|err| ScenarioError::LoadFailed(format!("{err:#}")))
    }
}

// == In-Memory Implementation ==
/// Storage holding records in process memory. Not durable.
#[derive(Default)]
pub struct MemoryScenarioStorage {
    records: RwLock<HashMap<String, Vec<SavedScenarioRecord>>>,
    next_id: AtomicU64,
    model: String,
}

impl MemoryScenarioStorage {
    /// Creates an empty in-memory storage.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            model: model.into(),
        }
    }

    /// Removes a saved record; used by explicit user delete.
    /// Returns true if a record was removed.
    pub async fn delete(&self, entity_id: &str, record_id: &str) -> bool {
        let mut records = self.records.write().await;
        match records.get_mut(entity_id) {
            Some(list) => {
                let before = list.len();
                list.retain(|record| record.id != record_id);
                before != list.len()
            }
            None => false,
        }
    }
}

#[async_trait]
impl ScenarioStorage for MemoryScenarioStorage {
    async fn save(&self, entity_id: &str, bundle: &ScenarioBundle) -> Result<String> {
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = SavedScenarioRecord {
            id: id.clone(),
            bundle: bundle.clone(),
            generated_at: Utc::now(),
            model: self.model.clone(),
            schema_version: SCHEMA_VERSION,
        };

        let mut records = self.records.write().await;
        records.entry(entity_id.to_string()).or_default().insert(0, record);
        Ok(id)
    }

    async fn load_saved(&self, entity_id: &str) -> Result<Vec<SavedScenarioRecord>> {
        let records = self.records.read().await;
        Ok(records.get(entity_id).cloned().unwrap_or_default())
    }
}
