//! Post entity - a top-level forum post that can receive reactions

use chrono::{DateTime, Utc};

use crate::value_objects::{ReactionCounts, TargetRef};

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub forum_id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub counts: ReactionCounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post with zeroed counters
    pub fn new(
        id: impl Into<String>,
        forum_id: impl Into<String>,
        author_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            forum_id: forum_id.into(),
            author_id: author_id.into(),
            title: title.into(),
            content: content.into(),
            counts: ReactionCounts::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reaction target for this post
    pub fn target(&self) -> TargetRef {
        TargetRef::post(self.id.clone())
    }
}
