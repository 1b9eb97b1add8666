//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{EntityKind, Snowflake};

/// Domain layer errors
///
/// Every variant carries enough context (kind, id, field) for a caller to
/// render an actionable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid {kind} {field}: {message}")]
    Validation {
        kind: EntityKind,
        field: String,
        message: String,
    },

    // =========================================================================
    // Referential Integrity Errors
    // =========================================================================
    #[error("{kind} {field} references unknown {target} {id}")]
    ReferentialIntegrity {
        kind: EntityKind,
        field: &'static str,
        target: EntityKind,
        id: Snowflake,
    },

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Snowflake },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("{kind} with {field} '{value}' already exists")]
    Conflict {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Integrity invariant violated: {0}")]
    IntegrityInvariant(String),

    #[error("Concurrent modification detected, transaction aborted")]
    TransactionConflict,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Create a field validation error
    pub fn validation(kind: EntityKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a dangling-reference error
    pub fn dangling(
        kind: EntityKind,
        field: &'static str,
        target: EntityKind,
        id: Snowflake,
    ) -> Self {
        Self::ReferentialIntegrity {
            kind,
            field,
            target,
            id,
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: EntityKind, id: Snowflake) -> Self {
        Self::NotFound { kind, id }
    }

    /// Create a uniqueness conflict error
    pub fn conflict(kind: EntityKind, field: &'static str, value: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            field,
            value: value.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ReferentialIntegrity { .. } => "REFERENTIAL_INTEGRITY",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::IntegrityInvariant(_) => "INTEGRITY_INVARIANT",
            Self::TransactionConflict => "TRANSACTION_CONFLICT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// The entity kind this error is about, when there is one
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::Validation { kind, .. }
            | Self::ReferentialIntegrity { kind, .. }
            | Self::NotFound { kind, .. }
            | Self::Conflict { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a dangling-reference error
    pub fn is_referential(&self) -> bool {
        matches!(self, Self::ReferentialIntegrity { .. })
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::TransactionConflict)
    }

    /// Check if this is a structural invariant violation
    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::IntegrityInvariant(_))
    }
}
