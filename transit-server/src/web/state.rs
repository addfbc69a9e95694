//! Application state for the web layer.

use std::sync::Arc;

use crate::connections::ConnectionConfig;
use crate::store::{CachedRouteStore, MemoryRouteStore};

/// Store type the server runs on.
pub type SharedStore = CachedRouteStore<MemoryRouteStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached route and schedule store
    pub store: Arc<SharedStore>,

    /// Connection search configuration
    pub config: Arc<ConnectionConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: SharedStore, config: ConnectionConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
