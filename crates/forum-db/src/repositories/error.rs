//! Error handling utilities for repositories

use forum_core::{DomainError, TargetKind};
use sqlx::Error as SqlxError;

/// SQLSTATE serialization_failure
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE deadlock_detected
const DEADLOCK_DETECTED: &str = "40P01";

/// Convert SQLx error to DomainError
///
/// Serialization failures and deadlocks become `TransactionConflict` so the caller may
/// retry the whole unit of work. Row decoding problems are internal errors. Everything
/// else is an infrastructure failure.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if matches!(
            db_err.code().as_deref(),
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
        ) {
            return DomainError::TransactionConflict;
        }
    }

    match e {
        SqlxError::ColumnDecode { .. } | SqlxError::ColumnNotFound(_) | SqlxError::Decode(_) => {
            DomainError::InternalError(e.to_string())
        }
        _ => DomainError::StoreUnavailable(e.to_string()),
    }
}

/// Check for a foreign key violation and return the given error, or fall back to
/// [`map_db_error`]
pub fn map_foreign_key_violation<F>(e: SqlxError, on_violation: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_violation();
        }
    }
    map_db_error(e)
}

/// Table holding the counters for a target kind
pub(crate) const fn target_table(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Post => "posts",
        TargetKind::Comment => "comments",
    }
}
