use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use domain_events::EventError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    /// The booking points at an event that does not exist
    #[error("{0}")]
    Referential(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Rejections caused by the request itself rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Referential(_))
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) | BookingError::Referential(msg) => {
                AppError::BadRequest(msg)
            }
            BookingError::Connection(msg) => {
                tracing::error!("Booking store unreachable: {}", msg);
                AppError::ServiceUnavailable("Database is unavailable".to_string())
            }
            BookingError::Configuration(msg)
            | BookingError::Database(msg)
            | BookingError::Internal(msg) => {
                tracing::error!("Booking operation failed: {}", msg);
                AppError::InternalServerError("An internal server error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<DatabaseError> for BookingError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConfigError(msg) => BookingError::Configuration(msg),
            DatabaseError::ConnectionFailed(msg) | DatabaseError::HealthCheckFailed(msg) => {
                BookingError::Connection(msg)
            }
            DatabaseError::Generic(msg) => BookingError::Database(msg),
        }
    }
}

impl From<EventError> for BookingError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Configuration(msg) => BookingError::Configuration(msg),
            EventError::Connection(msg) => BookingError::Connection(msg),
            EventError::Database(msg) => BookingError::Database(msg),
            other => BookingError::Internal(other.to_string()),
        }
    }
}

impl From<mongodb::error::Error> for BookingError {
    fn from(err: mongodb::error::Error) -> Self {
        BookingError::Database(err.to_string())
    }
}
