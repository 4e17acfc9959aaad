//! MongoDB connector, configuration and health checks

mod config;
mod connector;
mod health;
mod helpers;

pub use config::{DEFAULT_DATABASE, MongoConfig, URI_ENV_VARS};
pub use connector::{
    MongoConnectionManager, MongoConnector, connect_from_config, connect_from_config_with_retry,
};
pub use helpers::{DUPLICATE_KEY_CODE, is_duplicate_key_error, timestamp_millis, uuid_as_string};
pub use health::{HealthStatus, check_health, check_health_detailed, check_manager_health};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
