use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::config::{DEFAULT_DATABASE, MongoConfig};
use crate::common::{
    ConnectionManager, Connector, DatabaseError, DatabaseResult, RetryConfig,
    retry_with_backoff_if,
};

/// Process-wide MongoDB connection gate
pub type MongoConnectionManager = ConnectionManager<MongoConnector>;

/// Connect using a MongoConfig and return the configured database handle
///
/// The connection is verified with a `ping` before it is returned.
///
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "dev_events");
/// let db = connect_from_config(&config).await?;
/// ```
#[instrument(skip(config), fields(url = %config.redacted_url()))]
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Database> {
    info!("Attempting to connect to MongoDB");

    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(|e| DatabaseError::ConfigError(format!("invalid MongoDB URI: {}", e)))?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;
    let db = select_database(&client, config);

    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(database = db.name(), "Successfully connected to MongoDB");
    Ok(db)
}

/// Connect from config with exponential backoff on transient failures
///
/// Configuration errors (such as a malformed URI) are not retried.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: RetryConfig,
) -> DatabaseResult<Database> {
    retry_with_backoff_if(
        || connect_from_config(config),
        retry_config,
        DatabaseError::is_transient,
    )
    .await
}

fn select_database(client: &Client, config: &MongoConfig) -> Database {
    match config.database() {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
    }
}

/// [`Connector`] for MongoDB.
///
/// Built either from an explicit [`MongoConfig`] or, with the `config`
/// feature, from the environment. In the latter case the environment is read
/// on each connection attempt, so a missing `MONGODB_URI` surfaces as a
/// [`DatabaseError::ConfigError`] on first use rather than at startup.
#[derive(Debug, Clone, Default)]
pub struct MongoConnector {
    config: Option<MongoConfig>,
}

impl MongoConnector {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Defer configuration to the environment (`MONGODB_URI`, ...)
    pub fn from_env() -> Self {
        Self { config: None }
    }

    fn resolve_config(&self) -> DatabaseResult<MongoConfig> {
        match &self.config {
            Some(config) => Ok(config.clone()),
            None => config_from_env(),
        }
    }
}

#[cfg(feature = "config")]
fn config_from_env() -> DatabaseResult<MongoConfig> {
    use core_config::FromEnv;
    Ok(MongoConfig::from_env()?)
}

#[cfg(not(feature = "config"))]
fn config_from_env() -> DatabaseResult<MongoConfig> {
    Err(DatabaseError::ConfigError(
        "MONGODB_URI is required but no MongoDB configuration was provided".to_string(),
    ))
}

#[async_trait]
impl Connector for MongoConnector {
    type Connection = Database;

    async fn connect(&self) -> DatabaseResult<Database> {
        let config = self.resolve_config()?;
        let retry = RetryConfig::new().with_max_retries(config.connect_retries);
        connect_from_config_with_retry(&config, retry).await
    }
}
