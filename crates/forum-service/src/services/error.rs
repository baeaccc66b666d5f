//! Service layer error types
//!
//! Store failures carry the operation and the (user, target) they ran for, so a
//! 503 in the logs says which toggle or view could not reach the store.

use forum_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Store failure, annotated with the operation and what it ran for.
    /// `user_id` is empty for reads made on behalf of nobody in particular.
    Store {
        operation: &'static str,
        user_id: String,
        target: String,
        source: DomainError,
    },

    /// Malformed request input
    Validation(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Store {
                operation,
                user_id,
                target,
                source,
            } if user_id.is_empty() => write!(f, "{operation} failed on {target}: {source}"),
            Self::Store {
                operation,
                user_id,
                target,
                source,
            } => write!(f, "{operation} failed for user {user_id} on {target}: {source}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) | Self::Store { source: e, .. } => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl ServiceError {
    /// Wrap a store error with the operation and the (user, target) it ran for
    pub fn store(
        operation: &'static str,
        user_id: impl Into<String>,
        target: impl fmt::Display,
        source: DomainError,
    ) -> Self {
        Self::Store {
            operation,
            user_id: user_id.into(),
            target: target.to_string(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The underlying domain error, if there is one
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::Store { source: e, .. } => Some(e),
            Self::Validation(_) => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) | Self::Store { source: e, .. } => e.status_code(),
            Self::Validation(_) => 400,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) | Self::Store { source: e, .. } => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
