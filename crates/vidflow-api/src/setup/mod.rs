//! Application setup and initialization
//!
//! Builds the backends for the configured role, wires the in-process pipeline when one is
//! needed, and assembles the router.

pub mod routes;
pub mod server;

use crate::pipeline::{spawn_local_pipeline, spawn_work_message_drain};
use crate::state::{AppState, GatewayState, WatcherState};
use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vidflow_core::{Config, StorageBackend};
use vidflow_queue::{create_work_queue, IngestionWatcher, Redelivery, RedeliveryPolicy};
use vidflow_storage::create_storage;

/// An initialized application: state, router, and the background tasks it spawned.
pub struct App {
    pub state: AppState,
    pub router: axum::Router,
    pub background: Vec<JoinHandle<()>>,
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<App> {
    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        role = ?config.role,
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    build_app(config).await
}

/// Wire backends, watcher, and router without touching global state.
pub async fn build_app(config: Config) -> Result<App> {
    let mut background = Vec::new();

    let local_pipeline = config.runs_local_pipeline();
    let (event_tx, event_rx) = if local_pipeline {
        let (tx, rx) = mpsc::unbounded_channel();
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let gateway = match &config.gateway {
        Some(gateway_config) => {
            if gateway_config.storage_backend == StorageBackend::Local && !local_pipeline {
                tracing::warn!(
                    "Local storage without an in-process watcher: uploads will not be ingested"
                );
            }
            let storage = create_storage(gateway_config, event_tx)
                .await
                .context("Failed to initialize object storage")?;
            tracing::info!(
                backend = %storage.backend_type(),
                bucket = %storage.bucket(),
                "Upload gateway storage ready"
            );
            Some(GatewayState { storage })
        }
        None => None,
    };

    let watcher = match &config.watcher {
        Some(watcher_config) => {
            let (queue, drain) = create_work_queue(watcher_config)
                .await
                .context("Failed to initialize work queue")?;
            tracing::info!(
                backend = %queue.backend_type(),
                queue = %queue.destination(),
                "Ingestion watcher queue ready"
            );
            if let Some(rx) = drain {
                background.push(spawn_work_message_drain(rx));
            }

            let watcher = IngestionWatcher::new(queue);
            if let Some(rx) = event_rx {
                let policy =
                    RedeliveryPolicy::with_max_attempts(watcher_config.redelivery_max_attempts);
                background.push(spawn_local_pipeline(
                    rx,
                    Redelivery::new(watcher.clone(), policy),
                ));
                tracing::info!("In-process ingestion pipeline started");
            }
            Some(WatcherState { watcher })
        }
        None => None,
    };

    let state = AppState {
        config: config.clone(),
        gateway,
        watcher,
    };

    let router = routes::build_router(&config, state.clone())?;

    Ok(App {
        state,
        router,
        background,
    })
}
