use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConnector;

pub use core_config::Environment;

/// Application configuration
///
/// MongoDB settings are not read here: the connector resolves `MONGODB_URI`
/// on the first connection attempt, so the server starts (and reports
/// "not ready") without a database.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
        })
    }

    /// Connector for the shared MongoDB connection
    pub fn mongo_connector(&self) -> MongoConnector {
        MongoConnector::from_env()
    }
}
