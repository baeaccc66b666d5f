//! Comment entity - a comment or reply on a post

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{ReactionCounts, TargetRef};

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    /// `None` for top-level comments
    pub parent_id: Option<String>,
    pub author_id: String,
    pub content: String,
    pub counts: ReactionCounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new top-level Comment
    pub fn new(
        id: impl Into<String>,
        post_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            post_id: post_id.into(),
            parent_id: None,
            author_id: author_id.into(),
            content: content.into(),
            counts: ReactionCounts::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Turn this comment into a reply to `parent_id`. An empty id means top-level.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = normalize_parent(Some(parent_id.into()));
        self
    }

    /// Override the creation timestamp (for imports and fixtures)
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// Parent id, treating an empty string as top-level
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.trim().is_empty())
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent().is_some()
    }

    /// Reaction target for this comment
    pub fn target(&self) -> TargetRef {
        TargetRef::comment(self.id.clone())
    }

    /// Replace the content after validating it
    pub fn edit(&mut self, content: String) -> Result<(), DomainError> {
        validate_comment_content(&content)?;
        self.content = content;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Map `Some("")` to `None`
pub fn normalize_parent(parent_id: Option<String>) -> Option<String> {
    parent_id.filter(|p| !p.trim().is_empty())
}

/// Content must be non-blank and at most [`MAX_COMMENT_LENGTH`] characters
pub fn validate_comment_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::EmptyContent);
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(DomainError::ContentTooLong {
            max: MAX_COMMENT_LENGTH,
        });
    }
    Ok(())
}
