//! Application error types
//!
//! The error surface handed to whatever presentation layer sits on top of the
//! catalog services. Each error maps to a stable code and an HTTP-style status.

use codex_core::DomainError;
use serde::Serialize;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Validation(_) => 400,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict
            Self::Conflict(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) | Self::Config(_) => 500,

            // Map domain errors to appropriate status codes
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_referential() || e.is_invariant() {
                    422
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code())
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        // Domain errors carry the entity kind; expose it so clients can point at the record
        let details = match err {
            AppError::Domain(e) => e
                .kind()
                .map(|kind| serde_json::json!({ "entity": kind.as_str() })),
            _ => None,
        };

        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use codex_core::{EntityKind, Snowflake};

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("character".to_string()).status_code(), 404);
        assert_eq!(AppError::Validation("test".to_string()).status_code(), 400);
        assert_eq!(AppError::Conflict("test".to_string()).status_code(), 409);
        assert_eq!(AppError::Database("test".to_string()).status_code(), 500);
    }

    #[test]
    fn test_domain_status_codes() {
        let dangling = DomainError::dangling(
            EntityKind::LoreEntry,
            "lore_type_id",
            EntityKind::LoreType,
            Snowflake::new(9999),
        );
        assert_eq!(AppError::from(dangling).status_code(), 422);

        let missing = DomainError::not_found(EntityKind::Character, Snowflake::new(1));
        assert_eq!(AppError::from(missing).status_code(), 404);

        let dup = DomainError::conflict(EntityKind::Attire, "name", "Battle Form");
        assert_eq!(AppError::from(dup).status_code(), 409);

        let invariant = DomainError::IntegrityInvariant("last attire".to_string());
        assert_eq!(AppError::from(invariant).status_code(), 422);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound("x".to_string()).error_code(), "NOT_FOUND");
        let err = AppError::from(DomainError::TransactionConflict);
        assert_eq!(err.error_code(), "TRANSACTION_CONFLICT");
    }

    #[test]
    fn test_client_server_split() {
        assert!(AppError::NotFound("test".to_string()).is_client_error());
        assert!(!AppError::Database("test".to_string()).is_client_error());
        assert!(AppError::Config("test".to_string()).is_server_error());
    }

    #[test]
    fn test_error_response() {
        let err = AppError::NotFound("character 7".to_string());
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found: character 7");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_domain_error_response_details() {
        let err = AppError::from(DomainError::not_found(EntityKind::GalleryImage, Snowflake::new(7)));
        let response = ErrorResponse::from(err);

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Gallery image not found: 7");
        assert_eq!(
            response.details,
            Some(serde_json::json!({ "entity": "gallery_image" }))
        );
    }
}
