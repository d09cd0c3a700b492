//! Application state and sub-state extractors.
//!
//! Each role owns a sub-state so its routes only see what they need. A sub-state is
//! `None` when the process does not run that role.

use std::sync::Arc;

use vidflow_core::Config;
use vidflow_queue::IngestionWatcher;
use vidflow_storage::Storage;

/// Upload gateway: the object store uploads are written to.
#[derive(Clone)]
pub struct GatewayState {
    pub storage: Arc<dyn Storage>,
}

/// Ingestion watcher: turns object-created notifications into work messages.
#[derive(Clone)]
pub struct WatcherState {
    pub watcher: IngestionWatcher,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Option<GatewayState>,
    pub watcher: Option<WatcherState>,
}
