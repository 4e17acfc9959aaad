//! Shared application state.

use database::mongodb::MongoConnectionManager;
use std::sync::Arc;

/// Cloned into every router; clones share the same connection manager.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Process-wide MongoDB connection, established on first use
    pub mongo: Arc<MongoConnectionManager>,
}

impl AppState {
    pub fn new(config: crate::config::Config) -> Self {
        let mongo = Arc::new(MongoConnectionManager::new(config.mongo_connector()));
        Self { config, mongo }
    }
}
