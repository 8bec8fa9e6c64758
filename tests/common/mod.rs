//! Shared test fixtures: programmable collaborator stubs and a wired
//! application stack.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use scenario_cache::collab::{MemoryScenarioStorage, ScenarioGenerator, ScenarioStorage};
use scenario_cache::config::Config;
use scenario_cache::error::{Result, ScenarioError};
use scenario_cache::models::{Observation, ProbabilityClass, Scenario, ScenarioBundle};
use scenario_cache::AppState;

/// Builds the bundle the stub generator returns; summary "x" and one
/// recommendation, matching what the flow tests assert on.
pub fn stub_bundle() -> ScenarioBundle {
    let scenario = |title: &str| Scenario {
        title: title.to_string(),
        narrative: "narrative".to_string(),
        probability: ProbabilityClass::Medium,
        actions: vec!["act".to_string()],
        timeline: "48h".to_string(),
        key_factors: vec!["factor".to_string()],
        resources: vec!["resource".to_string()],
    };
    ScenarioBundle {
        scenario_one: scenario("Scenario one"),
        scenario_two: scenario("Scenario two"),
        summary: "x".to_string(),
        recommendations: vec!["y".to_string()],
    }
}

/// Generation stub with a call counter, optional delay and optional
/// forced failure.
pub struct StubGenerator {
    pub calls: AtomicUsize,
    pub configured: bool,
    pub fail: bool,
    pub delay: Duration,
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            configured: true,
            fail: false,
            delay: Duration::ZERO,
        }
    }
}

impl StubGenerator {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScenarioGenerator for StubGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(
        &self,
        _entity_id: &str,
        _observations: &[Observation],
    ) -> Result<ScenarioBundle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(ScenarioError::GenerationFailed(
                "upstream quota exhausted".to_string(),
            ));
        }
        Ok(stub_bundle())
    }
}

/// Builds an application state around the given stub generator and a
/// fresh in-memory storage.
pub fn app_state(generator: Arc<StubGenerator>) -> AppState {
    AppState::new(
        &Config::default(),
        generator,
        Arc::new(MemoryScenarioStorage::new("test-model")),
    )
}

/// Like `app_state` but with a caller-supplied storage.
pub fn app_state_with_storage(
    generator: Arc<StubGenerator>,
    storage: Arc<dyn ScenarioStorage>,
) -> AppState {
    AppState::new(&Config::default(), generator, storage)
}

/// Two observations for the canonical "case-42" flow.
pub fn case_42_observations() -> Vec<Observation> {
    vec![
        Observation {
            id: "o1".to_string(),
            status: "open".to_string(),
            updated_at: "2026-08-20T10:00:00Z".to_string(),
        },
        Observation {
            id: "o2".to_string(),
            status: "open".to_string(),
            updated_at: "2026-08-21T09:30:00Z".to_string(),
        },
    ]
}
