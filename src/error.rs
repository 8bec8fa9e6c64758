//! Error types for the coordination service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Scenario Error Enum ==
/// Unified error type for the coordination service.
///
/// Collaborator failures are caught at the public operation boundary and
/// converted into these variants; they never crash the caller and never
/// reach the cache layer, which is infallible by design.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Generation collaborator is missing required configuration.
    /// Fail fast, no retry is attempted automatically.
    #[error("Generation backend not configured: {0}")]
    NotConfigured(String),

    /// The generation call itself threw or returned a business error
    #[error("Scenario generation failed: {0}")]
    GenerationFailed(String),

    /// Generation succeeded but the save did not; non-fatal
    #[error("Scenario persistence failed: {0}")]
    PersistenceFailed(String),

    /// Loading previously saved records failed
    #[error("Saved-scenario load failed: {0}")]
    LoadFailed(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected error, caught and stringified at the outermost boundary
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ScenarioError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScenarioError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ScenarioError::GenerationFailed(_)
            | ScenarioError::PersistenceFailed(_)
            | ScenarioError::LoadFailed(_) => StatusCode::BAD_GATEWAY,
            ScenarioError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ScenarioError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));
        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the coordination service.
pub type Result<T> = std::result::Result<T, ScenarioError>;
