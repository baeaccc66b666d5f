//! Comment entity <-> model mapper

use forum_core::entities::normalize_parent;
use forum_core::{Comment, ReactionCounts};

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: model.id,
            post_id: model.post_id,
            parent_id: normalize_parent(model.parent_id),
            author_id: model.author_id,
            content: model.content,
            counts: ReactionCounts::new(model.likes, model.dislikes),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
