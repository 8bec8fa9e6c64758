//! Configuration Module
//!
//! Handles loading and managing service configuration from environment
//! variables.

use std::env;

use crate::cache::DEFAULT_MAX_ENTRIES;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. The generated-outcome cache gets a long TTL because
/// generation is expensive; the saved-record cache a short one because
/// persisted data can change from other sessions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries per cache instance
    pub max_cache_entries: usize,
    /// TTL for generated outcomes, in seconds
    pub generated_ttl_secs: u64,
    /// TTL for saved records, in seconds
    pub saved_ttl_secs: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval_secs: u64,
    /// Proximity threshold for preloading, in pixels
    pub preload_threshold_px: u32,
    /// Generative-AI endpoint URL
    pub ai_endpoint: Option<String>,
    /// Generative-AI API key
    pub ai_api_key: Option<String>,
    /// Model identifier sent to the AI endpoint
    pub ai_model: String,
    /// Managed-backend endpoint for saved scenarios; in-memory fallback
    /// is used when unset
    pub storage_endpoint: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_ENTRIES` - Max entries per cache (default: 100)
    /// - `GENERATED_TTL_SECS` - Generated-outcome TTL (default: 1800)
    /// - `SAVED_TTL_SECS` - Saved-record TTL (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL_SECS` - Sweep frequency (default: 60)
    /// - `PRELOAD_THRESHOLD_PX` - Preload proximity threshold (default: 400)
    /// - `AI_ENDPOINT` / `AI_API_KEY` / `AI_MODEL` - generation collaborator
    /// - `STORAGE_ENDPOINT` - persistence collaborator
    pub fn from_env() -> Self {
        Self {
            max_cache_entries: env::var("MAX_CACHE_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            generated_ttl_secs: env::var("GENERATED_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            saved_ttl_secs: env::var("SAVED_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval_secs: env::var("CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            preload_threshold_px: env::var("PRELOAD_THRESHOLD_PX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(400),
            ai_endpoint: env::var("AI_ENDPOINT").ok().filter(|v| !v.is_empty()),
            ai_api_key: env::var("AI_API_KEY").ok().filter(|v| !v.is_empty()),
            ai_model: env::var("AI_MODEL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "scenario-analyst-1".to_string()),
            storage_endpoint: env::var("STORAGE_ENDPOINT").ok().filter(|v| !v.is_empty()),
        }
    }

    /// TTL for generated outcomes in milliseconds.
    pub fn generated_ttl_ms(&self) -> u64 {
        self.generated_ttl_secs * 1000
    }

    /// TTL for saved records in milliseconds.
    pub fn saved_ttl_ms(&self) -> u64 {
        self.saved_ttl_secs * 1000
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_entries: DEFAULT_MAX_ENTRIES,
            generated_ttl_secs: 1800,
            saved_ttl_secs: 300,
            server_port: 3000,
            cleanup_interval_secs: 60,
            preload_threshold_px: 400,
            ai_endpoint: None,
            ai_api_key: None,
            ai_model: "scenario-analyst-1".to_string(),
            storage_endpoint: None,
        }
    }
}
