//! Common utilities shared across database implementations

pub mod connection;
pub mod error;
pub mod retry;

pub use connection::{ConnectionManager, Connector};
pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry, retry_with_backoff, retry_with_backoff_if};
