//! Request DTOs for the coordination service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::Observation;

// == Generate Request ==
/// Request body for POST /cases/:id/scenarios/generate.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Observation projections in display order; the cache fingerprint
    /// is derived from this sequence
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl GenerateRequest {
    /// Returns an error message if the request is invalid, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.observations.iter().any(|obs| obs.id.is_empty()) {
            return Some("Observation ids cannot be empty".to_string());
        }
        None
    }
}

// == Preload Request ==
/// Request body for POST /cases/:id/scenarios/preload.
///
/// The UI layer reports how far (in pixels) the viewport's bottom edge is
/// from the scenario control; the service decides whether to preload.
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadRequest {
    /// Distance from the viewport bottom edge to the trigger element
    pub distance_px: u32,
    /// Observation projections, as for generation
    #[serde(default)]
    pub observations: Vec<Observation>,
}
