/// Unified database error type for connection management
///
/// Variants carry rendered messages rather than driver errors so a single
/// failed connection attempt can be handed to every caller awaiting it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Configuration error (e.g. missing connection string)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Generic(String),
}

impl DatabaseError {
    /// Whether the next connection attempt may succeed without operator action
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::HealthCheckFailed(_)
        )
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for DatabaseError {
    fn from(err: mongodb::error::Error) -> Self {
        DatabaseError::ConnectionFailed(err.to_string())
    }
}

#[cfg(feature = "config")]
impl From<core_config::ConfigError> for DatabaseError {
    fn from(err: core_config::ConfigError) -> Self {
        DatabaseError::ConfigError(err.to_string())
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(DatabaseError::ConnectionFailed("refused".into()).is_transient());
        assert!(!DatabaseError::ConfigError("missing MONGODB_URI".into()).is_transient());
    }

    #[test]
    fn test_display_includes_kind() {
        let err = DatabaseError::ConfigError("MONGODB_URI is not set".into());
        assert_eq!(err.to_string(), "Configuration error: MONGODB_URI is not set");
    }
}
