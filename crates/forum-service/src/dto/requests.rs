//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use forum_core::{DomainError, ReactionChoice};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Reaction Requests
// ============================================================================

/// Set the caller's reaction on a post or comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetReactionRequest {
    /// "like", "dislike" or "none"
    #[validate(length(min = 1, max = 16, message = "Reaction must be like, dislike or none"))]
    pub reaction: String,
}

impl SetReactionRequest {
    /// Parse the requested state
    ///
    /// # Errors
    /// Returns `InvalidReactionType` for anything but like, dislike or none
    pub fn choice(&self) -> Result<ReactionChoice, DomainError> {
        self.reaction.parse()
    }
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create comment or reply request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: String,
}

/// Edit comment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: String,
}
