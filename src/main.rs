//! Scenario Cache - caching and coordination service for AI-generated
//! missing-person resolution scenarios

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scenario_cache::api::create_router;
use scenario_cache::collab::{
    HttpScenarioGenerator, HttpScenarioStorage, MemoryScenarioStorage, ScenarioStorage,
};
use scenario_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the scenario coordination service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the collaborator clients (AI generator, storage)
/// 4. Create both cache instances and the coordinator stack
/// 5. Start the background cache sweep task
/// 6. Create Axum router with all endpoints
/// 7. Start HTTP server on configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenario_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scenario Coordination Service");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: max_cache_entries={}, generated_ttl={}s, saved_ttl={}s, port={}",
        config.max_cache_entries, config.generated_ttl_secs, config.saved_ttl_secs,
        config.server_port
    );

    // Build collaborators
    let generator = Arc::new(HttpScenarioGenerator::from_config(&config));
    if config.ai_endpoint.is_none() || config.ai_api_key.is_none() {
        warn!("AI collaborator not configured; generation requests will fail fast");
    }
    let storage: Arc<dyn ScenarioStorage> = match &config.storage_endpoint {
        Some(endpoint) => Arc::new(HttpScenarioStorage::new(
            endpoint.clone(),
            config.ai_model.clone(),
        )),
        None => {
            warn!("STORAGE_ENDPOINT not set; using non-durable in-memory storage");
            Arc::new(MemoryScenarioStorage::new(config.ai_model.clone()))
        }
    };

    // Create application state with both caches and the coordinator
    let state = AppState::new(&config, generator, storage);
    info!("Cache instances and coordinator initialized");

    // Start background sweep task
    let cleanup_handle = spawn_cleanup_task(
        Arc::clone(&state.generated_cache),
        Arc::clone(&state.saved_cache),
        config.cleanup_interval_secs,
    );
    info!("Background cache sweep task started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    cleanup_handle.abort();
    warn!("Cache sweep task aborted");
}
