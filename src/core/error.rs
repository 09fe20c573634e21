use std::time::Duration;

use thiserror::Error;

use crate::core::validation::ValidationError;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
///
/// # Example
///
/// ```no_run
/// use markaz::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Required configuration value is absent
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The data store did not answer within the commit timeout
    #[error("Registration commit timed out after {0:?}")]
    CommitTimeout(Duration),

    /// The user already has a different registration on file
    #[error("Telegram user {0} is already registered")]
    AlreadyRegistered(i64),

    /// Any other data store failure
    #[error("Store error: {0}")]
    Store(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: AppError = ValidationError::Incomplete("phone").into();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("phone"));
    }

    #[test]
    fn test_commit_timeout_display() {
        let err = AppError::CommitTimeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Registration commit timed out after 10s");
    }
}
