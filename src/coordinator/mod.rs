//! Coordinator Module
//!
//! Orchestration of scenario generation and saved-record loading over
//! the cache layer: per-entity coalescing, persistence side effects and
//! the proximity preloader.

mod generate;
mod inflight;
mod preload;
mod saved;

pub use generate::{GenerationCoordinator, GenerationState};
pub use inflight::InFlight;
pub use preload::ProximityPreloader;
pub use saved::{SavedScenarioLoader, SavedState};
