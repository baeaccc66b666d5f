//! Test fixtures
//!
//! Seed data plus the request and response shapes the API speaks.

use chrono::{Duration, Utc};
use forum_core::{Comment, Post};
use forum_db::MemoryStore;
use serde::{Deserialize, Serialize};

/// Author of the seeded thread on `post-1`
pub const THREAD_AUTHOR: &str = "alice";

/// A store with two posts and a two-level thread on `post-1`
///
/// ```text
/// post-1
/// └── comment-1 (alice)
///     └── comment-2 (bob)
/// post-2 (no comments)
/// ```
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let base = Utc::now() - Duration::hours(1);

    store.insert_post(Post::new("post-1", "forum-1", THREAD_AUTHOR, "First", "Hello"));
    store.insert_post(Post::new("post-2", "forum-1", "bob", "Second", "World"));
    store.insert_comment(
        Comment::new("comment-1", "post-1", THREAD_AUTHOR, "first!").with_created_at(base),
    );
    store.insert_comment(
        Comment::new("comment-2", "post-1", "bob", "reply")
            .with_parent("comment-1")
            .with_created_at(base + Duration::minutes(1)),
    );

    store
}

// ============================================================================
// Requests
// ============================================================================

/// Body of PUT .../reaction
#[derive(Debug, Serialize)]
pub struct SetReaction {
    pub reaction: String,
}

impl SetReaction {
    pub fn like() -> Self {
        Self::of("like")
    }

    pub fn dislike() -> Self {
        Self::of("dislike")
    }

    pub fn none() -> Self {
        Self::of("none")
    }

    pub fn of(reaction: &str) -> Self {
        Self {
            reaction: reaction.to_string(),
        }
    }
}

/// Body of comment create, reply and edit requests
#[derive(Debug, Serialize)]
pub struct CommentBody {
    pub content: String,
}

impl CommentBody {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Counts {
    pub likes: i64,
    pub dislikes: i64,
}

impl Counts {
    pub fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReactionResult {
    pub target_id: String,
    pub target_kind: String,
    pub reaction: String,
    pub counts: Counts,
    pub changed: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserReaction {
    pub target_id: String,
    pub reaction: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRecord {
    pub user_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub reaction_type: String,
}

#[derive(Debug, Deserialize)]
pub struct PostView {
    pub id: String,
    pub counts: Counts,
    pub viewer_reaction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author_id: String,
    pub content: String,
    pub counts: Counts,
    pub viewer_reaction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: CommentView,
    pub replies: Vec<CommentNode>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
