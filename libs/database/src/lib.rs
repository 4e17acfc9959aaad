//! Database library providing lazily-established, process-wide connections
//!
//! The [`common::ConnectionManager`] memoizes a single connection per process:
//! the first caller starts the connection attempt, concurrent callers await the
//! same attempt, a failed attempt is forgotten so the next call retries, and a
//! successful one is reused for the lifetime of the manager.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector, configuration and health checks
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Examples
//!
//! ## MongoDB
//!
//! ```ignore
//! use database::mongodb::{MongoConnectionManager, MongoConnector};
//!
//! // Reads MONGODB_URI on first use
//! let manager = MongoConnectionManager::new(MongoConnector::from_env());
//! let db = manager.get().await?;
//! let collection = db.collection::<Document>("events");
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

// Re-exports for convenience
pub use common::{ConnectionManager, Connector, DatabaseError, DatabaseResult};
