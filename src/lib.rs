//! Scenario Cache - caching and coordination for AI-generated
//! missing-person resolution scenarios
//!
//! Provides a TTL cache layer, a generation coordinator with per-entity
//! coalescing, a saved-results loader and a proximity preloader, behind
//! a small HTTP API.

pub mod api;
pub mod cache;
pub mod collab;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
