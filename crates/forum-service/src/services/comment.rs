//! Comment service
//!
//! Comment threads on posts: creation, replies, author-only edits and deletes, and the
//! reply tree with the viewer's own reactions overlaid.

use forum_core::{
    build_comment_tree, count_nodes, validate_comment_content, Comment, CommentNode, DomainError,
    ReactionType, TargetKind, TargetRef, ViewerReactions,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// A comment together with the viewer's reaction on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAggregateView {
    pub comment: Comment,
    pub viewer_reaction: Option<ReactionType>,
}

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build the reply tree for a post, overlaying `viewer_id`'s reactions when given
    #[instrument(skip(self))]
    pub async fn build_comment_tree(
        &self,
        post_id: &str,
        viewer_id: Option<&str>,
    ) -> ServiceResult<Vec<CommentNode>> {
        let user = viewer_id.unwrap_or_default();
        self.require_post(post_id, user).await?;

        let comments = self
            .ctx
            .comment_repo()
            .list_by_post(post_id)
            .await
            .map_err(|e| ServiceError::store("list comments", user, TargetRef::post(post_id), e))?;
        let total = comments.len();

        let viewer_reactions = match viewer_id {
            Some(viewer) => Some(self.viewer_reactions(viewer, &comments).await?),
            None => None,
        };

        let tree = build_comment_tree(comments, viewer_reactions.as_ref());

        let rendered = count_nodes(&tree);
        if rendered < total {
            debug!(
                dropped = total - rendered,
                "Omitted comments whose parent is missing"
            );
        }

        Ok(tree)
    }

    /// One batch lookup of the viewer's reactions on exactly these comments
    async fn viewer_reactions(
        &self,
        viewer_id: &str,
        comments: &[Comment],
    ) -> ServiceResult<ViewerReactions> {
        if comments.is_empty() {
            return Ok(ViewerReactions::new());
        }

        let ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
        let reactions = self
            .ctx
            .reaction_store()
            .find_for_targets(viewer_id, TargetKind::Comment, &ids)
            .await
            .map_err(|e| ServiceError::store("load viewer reactions", viewer_id, "comments", e))?;

        Ok(reactions
            .into_iter()
            .map(|r| (r.target_id, r.reaction_type))
            .collect())
    }

    /// Create a top-level comment on a post
    #[instrument(skip(self, content))]
    pub async fn create_comment(
        &self,
        post_id: &str,
        author_id: &str,
        content: &str,
    ) -> ServiceResult<Comment> {
        validate_comment_content(content)?;
        self.require_post(post_id, author_id).await?;

        let comment = Comment::new(Uuid::new_v4().to_string(), post_id, author_id, content);
        self.ctx
            .comment_repo()
            .create(&comment)
            .await
            .map_err(|e| {
                ServiceError::store("create comment", author_id, TargetRef::post(post_id), e)
            })?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment created");
        Ok(comment)
    }

    /// Reply to an existing comment; the reply lives on the parent's post
    #[instrument(skip(self, content))]
    pub async fn create_reply(
        &self,
        parent_id: &str,
        author_id: &str,
        content: &str,
    ) -> ServiceResult<Comment> {
        validate_comment_content(content)?;
        let parent = self.require_comment(parent_id, author_id).await?;

        let reply = Comment::new(
            Uuid::new_v4().to_string(),
            parent.post_id.clone(),
            author_id,
            content,
        )
        .with_parent(parent.id.clone());
        self.ctx
            .comment_repo()
            .create(&reply)
            .await
            .map_err(|e| ServiceError::store("create reply", author_id, parent.target(), e))?;

        info!(comment_id = %reply.id, parent_id = %parent.id, "Reply created");
        Ok(reply)
    }

    /// Replace a comment's content. Only its author may do this.
    #[instrument(skip(self, content))]
    pub async fn update_comment(
        &self,
        comment_id: &str,
        user_id: &str,
        content: &str,
    ) -> ServiceResult<Comment> {
        let mut comment = self.require_comment(comment_id, user_id).await?;
        if comment.author_id != user_id {
            return Err(DomainError::NotCommentAuthor.into());
        }

        comment.edit(content.to_string())?;
        self.ctx
            .comment_repo()
            .update(&comment)
            .await
            .map_err(|e| ServiceError::store("update comment", user_id, comment.target(), e))?;

        info!(comment_id = %comment_id, "Comment updated");
        Ok(comment)
    }

    /// Permanently delete a comment and the reactions on it. Only its author may do this.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: &str, user_id: &str) -> ServiceResult<()> {
        let comment = self.require_comment(comment_id, user_id).await?;
        if comment.author_id != user_id {
            return Err(DomainError::NotCommentAuthor.into());
        }

        self.ctx
            .comment_repo()
            .delete(comment_id)
            .await
            .map_err(|e| ServiceError::store("delete comment", user_id, comment.target(), e))?;

        info!(comment_id = %comment_id, post_id = %comment.post_id, "Comment deleted");
        Ok(())
    }

    /// A single comment with the viewer's reaction on it
    #[instrument(skip(self))]
    pub async fn get_comment_view(
        &self,
        comment_id: &str,
        viewer_id: Option<&str>,
    ) -> ServiceResult<CommentAggregateView> {
        let comment = self
            .require_comment(comment_id, viewer_id.unwrap_or_default())
            .await?;

        let viewer_reaction = match viewer_id {
            Some(viewer) => self
                .ctx
                .reaction_store()
                .find(viewer, &comment.target())
                .await
                .map_err(|e| ServiceError::store("find reaction", viewer, comment.target(), e))?
                .map(|r| r.reaction_type),
            None => None,
        };

        Ok(CommentAggregateView {
            comment,
            viewer_reaction,
        })
    }

    async fn require_post(&self, post_id: &str, user_id: &str) -> ServiceResult<()> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await
            .map_err(|e| ServiceError::store("find post", user_id, TargetRef::post(post_id), e))?;
        match post {
            Some(_) => Ok(()),
            None => Err(DomainError::PostNotFound(post_id.to_string()).into()),
        }
    }

    async fn require_comment(&self, comment_id: &str, user_id: &str) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await
            .map_err(|e| {
                ServiceError::store("find comment", user_id, TargetRef::comment(comment_id), e)
            })?
            .ok_or_else(|| DomainError::CommentNotFound(comment_id.to_string()).into())
    }
}
