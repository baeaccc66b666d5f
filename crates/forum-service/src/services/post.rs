//! Post service
//!
//! Read-side views over posts. Posts themselves are owned elsewhere; this service only
//! joins them with reaction state.

use std::collections::HashMap;

use forum_core::{DomainError, Post, ReactionType, TargetKind, TargetRef};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// A post together with the viewer's reaction on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAggregateView {
    pub post: Post,
    pub viewer_reaction: Option<ReactionType>,
}

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a post with its counters and, when a viewer is given, the viewer's reaction
    #[instrument(skip(self))]
    pub async fn get_post_view(
        &self,
        post_id: &str,
        viewer_id: Option<&str>,
    ) -> ServiceResult<PostAggregateView> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await
            .map_err(|e| {
                ServiceError::store(
                    "find post",
                    viewer_id.unwrap_or_default(),
                    TargetRef::post(post_id),
                    e,
                )
            })?
            .ok_or_else(|| DomainError::PostNotFound(post_id.to_string()))?;

        let viewer_reaction = match viewer_id {
            Some(viewer) => self
                .ctx
                .reaction_store()
                .find(viewer, &post.target())
                .await
                .map_err(|e| ServiceError::store("find reaction", viewer, post.target(), e))?
                .map(|r| r.reaction_type),
            None => None,
        };

        Ok(PostAggregateView {
            post,
            viewer_reaction,
        })
    }

    /// Posts the user currently likes, most recently liked first
    #[instrument(skip(self))]
    pub async fn liked_posts(&self, user_id: &str) -> ServiceResult<Vec<Post>> {
        let reactions = self
            .ctx
            .reaction_store()
            .find_by_user(user_id, TargetKind::Post, Some(ReactionType::Like))
            .await
            .map_err(|e| ServiceError::store("list liked posts", user_id, "posts", e))?;

        let ids: Vec<String> = reactions.into_iter().map(|r| r.target_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<String, Post> = self
            .ctx
            .post_repo()
            .find_by_ids(&ids)
            .await
            .map_err(|e| ServiceError::store("load liked posts", user_id, "posts", e))?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let posts: Vec<Post> = ids.iter().filter_map(|id| by_id.remove(id)).collect();
        if posts.len() < ids.len() {
            debug!(missing = ids.len() - posts.len(), "Liked posts no longer exist");
        }

        Ok(posts)
    }
}
