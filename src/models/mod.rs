//! Models Module
//!
//! Domain types plus request/response DTOs for the HTTP API.

pub mod requests;
pub mod responses;
mod scenario;

pub use requests::{GenerateRequest, PreloadRequest};
pub use responses::{
    CachePairStats, ErrorResponse, GenerateResponse, HealthResponse, InvalidateResponse,
    PreloadResponse, SavedResponse, StateResponse,
};
pub use scenario::{
    GenerationOutcome, Observation, ProbabilityClass, SavedScenarioRecord, Scenario,
    ScenarioBundle,
};
