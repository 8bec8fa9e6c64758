//! Response DTOs for the coordination service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{GenerationOutcome, SavedScenarioRecord};

// == Generate Response ==
/// Response body for POST /cases/:id/scenarios/generate.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    /// The case the outcome belongs to
    pub entity_id: String,
    /// Generation outcome, cached failures included
    pub outcome: GenerationOutcome,
}

// == State Response ==
/// Observable per-case state snapshot for GET /cases/:id/scenarios.
///
/// Mirrors what the UI binds to: generated data, saved records, the two
/// loading flags, display-only errors and cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub entity_id: String,
    pub generated: Option<GenerationOutcome>,
    pub generated_loading: bool,
    pub generated_error: Option<String>,
    pub saved: Vec<SavedScenarioRecord>,
    pub saved_loading: bool,
    pub saved_error: Option<String>,
    pub cache: CachePairStats,
}

// == Saved Response ==
/// Response body for POST /cases/:id/scenarios/saved/refresh.
#[derive(Debug, Clone, Serialize)]
pub struct SavedResponse {
    pub entity_id: String,
    pub records: Vec<SavedScenarioRecord>,
}

// == Preload Response ==
/// Response body for POST /cases/:id/scenarios/preload.
#[derive(Debug, Clone, Serialize)]
pub struct PreloadResponse {
    pub entity_id: String,
    /// Whether a background generation was actually started
    pub triggered: bool,
}

// == Invalidate Response ==
/// Response body for DELETE /cases/:id/cache.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub entity_id: String,
    /// Entries removed across both caches
    pub removed: usize,
}

// == Cache Stats Responses ==
/// Statistics of both cache instances.
#[derive(Debug, Clone, Serialize)]
pub struct CachePairStats {
    pub generated: CacheStats,
    pub saved: CacheStats,
}

// == Health Response ==
/// Response body for GET /health.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a healthy response stamped with the current time.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Error Response ==
/// Error body returned by all failing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScenarioBundle;

    #[test]
    fn test_generate_response_serialize() {
        let resp = GenerateResponse {
            entity_id: "case-42".to_string(),
            outcome: GenerationOutcome::failed("quota exhausted".to_string()),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("case-42"));
        assert!(json.contains("quota exhausted"));
        assert!(json.contains(r#""success":false"#));
    }

    #[test]
    fn test_state_response_serialize() {
        let resp = StateResponse {
            entity_id: "case-42".to_string(),
            generated: Some(GenerationOutcome::saved(
                ScenarioBundle::fallback(),
                "rec-1".to_string(),
            )),
            generated_loading: false,
            generated_error: None,
            saved: vec![],
            saved_loading: true,
            saved_error: None,
            cache: CachePairStats {
                generated: CacheStats::new(),
                saved: CacheStats::new(),
            },
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""saved_loading":true"#));
        assert!(json.contains("rec-1"));
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("boom")).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("boom"));
    }
}
