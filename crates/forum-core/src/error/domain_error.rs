//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::TargetKind;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Target not found: {kind} {id}")]
    TargetNotFound { kind: TargetKind, id: String },

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid reaction type: {0:?} (expected like, dislike or none)")]
    InvalidReactionType(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not comment author")]
    NotCommentAuthor,

    // =========================================================================
    // Concurrency Errors
    // =========================================================================
    /// A concurrent writer invalidated the unit of work; safe to retry
    #[error("Transaction conflict")]
    TransactionConflict,

    #[error("Gave up after {attempts} conflicting attempts")]
    ConflictRetryExhausted { attempts: u32 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Shorthand for a missing reaction target
    pub fn target_not_found(kind: TargetKind, id: impl Into<String>) -> Self {
        Self::TargetNotFound {
            kind,
            id: id.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::TargetNotFound { .. } => "UNKNOWN_TARGET",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",

            // Validation
            Self::InvalidReactionType(_) => "INVALID_REACTION_TYPE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Authorization
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",

            // Concurrency
            Self::TransactionConflict => "TRANSACTION_CONFLICT",
            Self::ConflictRetryExhausted { .. } => "CONFLICT_RETRY_EXHAUSTED",

            // Infrastructure
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TargetNotFound { .. } | Self::PostNotFound(_) | Self::CommentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidReactionType(_)
                | Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotCommentAuthor)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::TransactionConflict)
    }

    /// Check if the service should be reported as temporarily unavailable
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ConflictRetryExhausted { .. } | Self::StoreUnavailable(_)
        )
    }

    /// Check if the coordinator may retry the unit of work
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionConflict)
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_unavailable() {
            503
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
