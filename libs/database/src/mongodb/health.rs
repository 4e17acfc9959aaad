use mongodb::Database;
use mongodb::bson::doc;
use std::time::Instant;

use super::MongoConnectionManager;
use crate::common::{DatabaseError, DatabaseResult};

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping the database
pub async fn check_health(db: &Database) -> bool {
    ping(db).await.is_ok()
}

/// Ping the database, reporting latency and error details
pub async fn check_health_detailed(db: &Database) -> HealthStatus {
    let start = Instant::now();
    let result = ping(db).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

/// Readiness probe through the connection manager.
///
/// Connects on first use, so a missing or unreachable MongoDB shows up here
/// rather than on the first user request.
pub async fn check_manager_health(manager: &MongoConnectionManager) -> DatabaseResult<()> {
    let db = manager.get().await?;
    ping(&db).await
}

async fn ping(db: &Database) -> DatabaseResult<()> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))
}
