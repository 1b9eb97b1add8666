//! Error handling utilities for the catalog stores

use codex_core::{Attire, DomainError, EntityKind, Snowflake, TxMode};
use sqlx::Error as SqlxError;

/// SQLSTATE codes that mean "retry the whole transaction"
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Unique constraint on `attires (character_id, name)`
const ATTIRE_NAME_CONSTRAINT: &str = "uq_attires_character_name";

/// Convert SQLx error to DomainError
///
/// Serialization failures and unique violations surface as
/// `TransactionConflict` (a concurrent writer won the race); foreign-key
/// violations mean a reference check was bypassed. Attire writes go through
/// [`map_attire_error`] so a duplicate name keeps its `Conflict` code.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        let code = db_err.code();
        if matches!(code.as_deref(), Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED))
            || db_err.is_unique_violation()
        {
            return DomainError::TransactionConflict;
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::IntegrityInvariant(db_err.message().to_string());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Convert an attire write error, reporting a duplicate name as a conflict
pub fn map_attire_error(attire: &Attire) -> impl FnOnce(SqlxError) -> DomainError + '_ {
    move |e| {
        let duplicate = e
            .as_database_error()
            .filter(|db_err| db_err.is_unique_violation())
            .and_then(|db_err| attire_name_conflict(db_err.constraint(), &attire.name));
        duplicate.unwrap_or_else(|| map_db_error(e))
    }
}

fn attire_name_conflict(constraint: Option<&str>, name: &str) -> Option<DomainError> {
    (constraint == Some(ATTIRE_NAME_CONSTRAINT))
        .then(|| DomainError::conflict(EntityKind::Attire, "name", name))
}

/// Reject writes issued on a read-only transaction
pub fn ensure_writable(mode: TxMode) -> Result<(), DomainError> {
    match mode {
        TxMode::ReadWrite => Ok(()),
        TxMode::ReadOnly => Err(read_only_write()),
    }
}

/// Error for a write issued on a read-only transaction
pub fn read_only_write() -> DomainError {
    DomainError::InternalError("write attempted in a read-only transaction".to_string())
}

/// Create a "row not found" error for a single-row update or delete
pub fn row_not_found(kind: EntityKind, id: Snowflake) -> DomainError {
    DomainError::not_found(kind, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_writable() {
        assert!(ensure_writable(TxMode::ReadWrite).is_ok());
        assert!(matches!(
            ensure_writable(TxMode::ReadOnly),
            Err(DomainError::InternalError(_))
        ));
    }

    #[test]
    fn test_attire_name_constraint_is_a_conflict() {
        assert_eq!(
            attire_name_conflict(Some("uq_attires_character_name"), "Battle Form"),
            Some(DomainError::conflict(EntityKind::Attire, "name", "Battle Form"))
        );
        assert_eq!(attire_name_conflict(Some("character_lore_links_pkey"), "Battle Form"), None);
        assert_eq!(attire_name_conflict(None, "Battle Form"), None);
    }

    #[test]
    fn test_non_database_errors_are_wrapped() {
        let err = map_db_error(SqlxError::RowNotFound);
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
