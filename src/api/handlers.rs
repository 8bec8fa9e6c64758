//! API Handlers
//!
//! HTTP request handlers for each coordination-service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio::sync::RwLock;

use crate::cache::{ScenarioCache, GENERATED_NAMESPACE, SAVED_NAMESPACE};
use crate::collab::{ScenarioGenerator, ScenarioStorage};
use crate::config::Config;
use crate::coordinator::{GenerationCoordinator, ProximityPreloader, SavedScenarioLoader};
use crate::error::{Result, ScenarioError};
use crate::models::{
    CachePairStats, GenerateRequest, GenerateResponse, GenerationOutcome, HealthResponse,
    InvalidateResponse, PreloadRequest, PreloadResponse, SavedResponse, SavedScenarioRecord,
    StateResponse,
};

/// Application state shared across all handlers.
///
/// Both cache instances are explicitly constructed here and injected
/// into the coordinator and loader, so tests can build isolated stacks
/// with their own collaborator stubs.
#[derive(Clone)]
pub struct AppState {
    /// Generation orchestration, owns the coalescing table
    pub coordinator: Arc<GenerationCoordinator>,
    /// Proximity-signal handler
    pub preloader: Arc<ProximityPreloader>,
    /// Long-TTL cache of generation outcomes
    pub generated_cache: Arc<RwLock<ScenarioCache<GenerationOutcome>>>,
    /// Short-TTL cache of saved records
    pub saved_cache: Arc<RwLock<ScenarioCache<Vec<SavedScenarioRecord>>>>,
}

impl AppState {
    /// Wires caches, loader, coordinator and preloader from the config
    /// and the two collaborators.
    pub fn new(
        config: &Config,
        generator: Arc<dyn ScenarioGenerator>,
        storage: Arc<dyn ScenarioStorage>,
    ) -> Self {
        let generated_cache = Arc::new(RwLock::new(ScenarioCache::new(
            GENERATED_NAMESPACE,
            config.max_cache_entries,
            config.generated_ttl_ms(),
        )));
        let saved_cache = Arc::new(RwLock::new(ScenarioCache::new(
            SAVED_NAMESPACE,
            config.max_cache_entries,
            config.saved_ttl_ms(),
        )));

        let saved = Arc::new(SavedScenarioLoader::new(
            Arc::clone(&saved_cache),
            Arc::clone(&storage),
        ));
        let coordinator = Arc::new(GenerationCoordinator::new(
            Arc::clone(&generated_cache),
            generator,
            storage,
            saved,
        ));
        let preloader = Arc::new(ProximityPreloader::new(
            Arc::clone(&coordinator),
            config.preload_threshold_px,
        ));

        Self {
            coordinator,
            preloader,
            generated_cache,
            saved_cache,
        }
    }
}

/// Handler for POST /cases/:id/scenarios/generate
///
/// Returns the cached outcome when valid, otherwise generates. Coalesced
/// concurrent callers all receive the winner's outcome.
pub async fn generate_handler(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ScenarioError::InvalidRequest(error_msg));
    }

    let outcome = state
        .coordinator
        .request_generation(&entity_id, &req.observations)
        .await?;

    Ok(Json(GenerateResponse { entity_id, outcome }))
}

/// Handler for GET /cases/:id/scenarios
///
/// Observable snapshot of both sides (generated + saved) plus cache
/// statistics; what a UI binds its spinners and panels to.
pub async fn state_handler(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
) -> Json<StateResponse> {
    let generation = state.coordinator.state(&entity_id).await;
    let saved = state.coordinator.saved().state(&entity_id).await;

    Json(StateResponse {
        entity_id,
        generated: generation.outcome,
        generated_loading: generation.loading,
        generated_error: generation.error,
        saved: saved.records,
        saved_loading: saved.loading,
        saved_error: saved.error,
        cache: CachePairStats {
            generated: state.generated_cache.write().await.stats(),
            saved: state.saved_cache.write().await.stats(),
        },
    })
}

/// Handler for POST /cases/:id/scenarios/saved/refresh
pub async fn refresh_saved_handler(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
) -> Result<Json<SavedResponse>> {
    let records = state.coordinator.saved().refresh(&entity_id).await?;
    Ok(Json(SavedResponse { entity_id, records }))
}

/// Handler for POST /cases/:id/scenarios/preload
///
/// Proximity signal from the UI layer. Never fails: a preload that does
/// not fire simply reports `triggered: false`.
pub async fn preload_handler(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
    Json(req): Json<PreloadRequest>,
) -> Json<PreloadResponse> {
    let triggered = state
        .preloader
        .observe(&entity_id, req.distance_px, req.observations)
        .await;

    Json(PreloadResponse {
        entity_id,
        triggered,
    })
}

/// Handler for DELETE /cases/:id/cache
///
/// Invalidates every cache entry of the case across both instances and
/// re-arms the preloader for it.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
) -> Json<InvalidateResponse> {
    let mut removed = state.coordinator.invalidate(&entity_id).await;
    removed += state.coordinator.saved().invalidate(&entity_id).await;
    state.preloader.reset(&entity_id);

    Json(InvalidateResponse { entity_id, removed })
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CachePairStats> {
    Json(CachePairStats {
        generated: state.generated_cache.write().await.stats(),
        saved: state.saved_cache.write().await.stats(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::collab::MemoryScenarioStorage;
    use crate::models::{Observation, ScenarioBundle};

    struct OkGenerator;

    #[async_trait]
    impl ScenarioGenerator for OkGenerator {
        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(
            &self,
            _entity_id: &str,
            _observations: &[Observation],
        ) -> Result<ScenarioBundle> {
            Ok(ScenarioBundle::fallback())
        }
    }

    fn test_state() -> AppState {
        AppState::new(
            &Config::default(),
            Arc::new(OkGenerator),
            Arc::new(MemoryScenarioStorage::new("test-model")),
        )
    }

    #[tokio::test]
    async fn test_generate_and_state_handlers() {
        let state = test_state();

        let req = GenerateRequest {
            observations: vec![],
        };
        let response = generate_handler(
            State(state.clone()),
            Path("case-1".to_string()),
            Json(req),
        )
        .await
        .unwrap();
        assert!(response.outcome.success);

        let snapshot = state_handler(State(state), Path("case-1".to_string())).await;
        assert!(snapshot.generated.is_some());
        assert!(!snapshot.generated_loading);
        assert_eq!(snapshot.saved.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_observations() {
        let state = test_state();

        let req = GenerateRequest {
            observations: vec![Observation {
                id: String::new(),
                status: String::new(),
                updated_at: String::new(),
            }],
        };
        let result =
            generate_handler(State(state), Path("case-1".to_string()), Json(req)).await;
        assert!(matches!(result, Err(ScenarioError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_invalidate_handler_counts_both_caches() {
        let state = test_state();

        let req = GenerateRequest {
            observations: vec![],
        };
        generate_handler(
            State(state.clone()),
            Path("case-1".to_string()),
            Json(req),
        )
        .await
        .unwrap();

        let response = invalidate_handler(State(state), Path("case-1".to_string())).await;
        // One generated outcome plus one saved-record entry.
        assert_eq!(response.removed, 2);
    }

    #[tokio::test]
    async fn test_invalidate_handler_resets_observable_state() {
        let state = test_state();

        let req = GenerateRequest {
            observations: vec![],
        };
        generate_handler(
            State(state.clone()),
            Path("case-42".to_string()),
            Json(req),
        )
        .await
        .unwrap();

        invalidate_handler(State(state.clone()), Path("case-42".to_string())).await;

        let snapshot = state_handler(State(state), Path("case-42".to_string())).await;
        assert!(snapshot.generated.is_none());
        assert!(snapshot.saved.is_empty());
    }

    #[tokio::test]
    async fn test_stats_handler_reports_both_instances() {
        let state = test_state();
        let response = stats_handler(State(state)).await;
        assert_eq!(response.generated.size, 0);
        assert_eq!(response.saved.size, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
