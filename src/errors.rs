use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error body returned by the HTTP layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g. "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Not null violation: {0}")]
    NotNullViolation(String),

    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

}

const FOREIGN_KEY_MARKERS: &[&str] = &[
    // SQLite
    "FOREIGN KEY constraint failed",
    // MySQL (1451 / 1452)
    "foreign key constraint fails",
    // Postgres (23503)
    "violates foreign key constraint",
];

const NOT_NULL_MARKERS: &[&str] = &[
    // SQLite
    "NOT NULL constraint failed",
    // MySQL (1048 / 1364)
    "cannot be null",
    "doesn't have a default value",
    // Postgres (23502)
    "violates not-null constraint",
];

impl ServiceError {
    /// Classifies an engine error into the constraint it tripped, if any.
    pub fn from_db(err: DbErr) -> Self {
        if let Some(SqlErr::ForeignKeyConstraintViolation(msg)) = err.sql_err() {
            return ServiceError::ForeignKeyViolation(msg);
        }

        let message = err.to_string();
        if FOREIGN_KEY_MARKERS.iter().any(|m| message.contains(m)) {
            ServiceError::ForeignKeyViolation(message)
        } else if NOT_NULL_MARKERS.iter().any(|m| message.contains(m)) {
            ServiceError::NotNullViolation(message)
        } else {
            ServiceError::DatabaseError(err)
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::ForeignKeyViolation(_) | Self::NotNullViolation(_)
        )
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ForeignKeyViolation(_) | Self::NotNullViolation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::DatabaseError(_) | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients. Internal failures get a generic text.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::ConfigError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        ServiceError::from_db(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}
