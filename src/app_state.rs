//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::domain::{Dispatcher, Registry};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of all open connections.
    pub registry: Arc<Registry>,
    /// Broadcast dispatcher over the registry.
    pub dispatcher: Dispatcher,
    /// Relay configuration (queue bounds).
    pub config: RelayConfig,
}

impl AppState {
    /// Builds application state from configuration, wiring the dispatcher
    /// to a fresh registry.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        Self {
            registry,
            dispatcher,
            config,
        }
    }
}
