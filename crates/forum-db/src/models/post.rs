//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: String,
    pub forum_id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counter columns shared by posts and comments
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CounterModel {
    pub likes: i64,
    pub dislikes: i64,
}
