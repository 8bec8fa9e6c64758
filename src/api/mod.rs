//! API Module
//!
//! HTTP handlers and routing for the coordination-service REST API.
//!
//! # Endpoints
//! - `POST /cases/:id/scenarios/generate` - Get-or-generate a scenario bundle
//! - `GET /cases/:id/scenarios` - Observable state snapshot
//! - `POST /cases/:id/scenarios/saved/refresh` - Refresh saved records
//! - `POST /cases/:id/scenarios/preload` - Proximity preload signal
//! - `DELETE /cases/:id/cache` - Invalidate both caches for a case
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
