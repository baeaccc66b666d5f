//! Post entity <-> model mapper

use forum_core::{Post, ReactionCounts};

use crate::models::{CounterModel, PostModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: model.id,
            forum_id: model.forum_id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            counts: ReactionCounts::new(model.likes, model.dislikes),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<CounterModel> for ReactionCounts {
    fn from(model: CounterModel) -> Self {
        ReactionCounts::new(model.likes, model.dislikes)
    }
}
