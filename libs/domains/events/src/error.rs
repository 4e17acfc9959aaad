use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use database::mongodb::is_duplicate_key_error;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("An event with slug '{0}' already exists")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl EventError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Convert EventError to AppError for standardized error responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::Conflict(slug) => {
                AppError::Conflict(format!("An event with slug '{}' already exists", slug))
            }
            EventError::Connection(msg) => {
                tracing::error!("Event store unreachable: {}", msg);
                AppError::ServiceUnavailable("Database is unavailable".to_string())
            }
            EventError::Configuration(msg) | EventError::Database(msg) | EventError::Internal(msg) => {
                tracing::error!("Event operation failed: {}", msg);
                AppError::InternalServerError("An internal server error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<DatabaseError> for EventError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConfigError(msg) => EventError::Configuration(msg),
            DatabaseError::ConnectionFailed(msg) | DatabaseError::HealthCheckFailed(msg) => {
                EventError::Connection(msg)
            }
            DatabaseError::Generic(msg) => EventError::Database(msg),
        }
    }
}

/// Duplicate-key violations carry no slug; callers that know it should use
/// [`EventError::Conflict`] directly.
impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key_error(&err) {
            EventError::Conflict(String::new())
        } else {
            EventError::Database(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        EventError::Internal(format!("BSON serialization failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (EventError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (EventError::validation("Title is required"), StatusCode::BAD_REQUEST),
            (EventError::Conflict("rustconf".into()), StatusCode::CONFLICT),
            (EventError::Connection("timeout".into()), StatusCode::SERVICE_UNAVAILABLE),
            (EventError::Configuration("no uri".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (EventError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_database_error_conversion() {
        assert!(matches!(
            EventError::from(DatabaseError::ConfigError("MONGODB_URI".into())),
            EventError::Configuration(_)
        ));
        assert!(matches!(
            EventError::from(DatabaseError::ConnectionFailed("refused".into())),
            EventError::Connection(_)
        ));
    }

    #[test]
    fn test_validation_message_is_bare() {
        assert_eq!(EventError::validation("invalid time").to_string(), "invalid time");
    }
}
