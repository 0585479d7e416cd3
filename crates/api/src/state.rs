use std::sync::Arc;

use nethub_jobs::{JobTracker, StageExecutor};
use nethub_registry::EntityStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The entity registry: devices, configs, repositories.
    pub store: Arc<EntityStore>,
    /// Background job tracker.
    pub jobs: Arc<JobTracker>,
    /// Stage executor handed to spawned job runners.
    pub executor: Arc<dyn StageExecutor>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}
