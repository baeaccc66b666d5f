//! Path parameter extractors
//!
//! Ids are opaque strings; the only rule is that they are not blank.

use serde::Deserialize;

use crate::response::ApiError;

fn non_blank<'a>(value: &'a str, name: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::invalid_path(format!("{name} must not be empty")));
    }
    Ok(trimmed)
}

/// Path parameters with post_id
#[derive(Debug, Deserialize)]
pub struct PostIdPath {
    pub post_id: String,
}

impl PostIdPath {
    pub fn post_id(&self) -> Result<&str, ApiError> {
        non_blank(&self.post_id, "post_id")
    }
}

/// Path parameters with comment_id
#[derive(Debug, Deserialize)]
pub struct CommentIdPath {
    pub comment_id: String,
}

impl CommentIdPath {
    pub fn comment_id(&self) -> Result<&str, ApiError> {
        non_blank(&self.comment_id, "comment_id")
    }
}
