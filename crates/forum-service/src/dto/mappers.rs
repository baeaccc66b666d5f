//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities and service views to response DTOs.

use forum_core::{Comment, CommentNode, Post, Reaction, ReactionCounts, ReactionType, TargetRef};

use crate::services::{CommentAggregateView, PostAggregateView, ReactionResult};

use super::responses::{
    CommentNodeResponse, CommentResponse, CountsResponse, PostResponse, ReactionResponse,
    ReactionResultResponse, UserReactionResponse,
};

// ============================================================================
// Reaction Mappers
// ============================================================================

impl From<ReactionCounts> for CountsResponse {
    fn from(counts: ReactionCounts) -> Self {
        Self {
            likes: counts.likes,
            dislikes: counts.dislikes,
        }
    }
}

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            user_id: reaction.user_id.clone(),
            target_id: reaction.target_id.clone(),
            target_kind: reaction.target_kind,
            reaction_type: reaction.reaction_type,
            created_at: reaction.created_at,
            updated_at: reaction.updated_at,
        }
    }
}

impl From<(&TargetRef, &ReactionResult)> for ReactionResultResponse {
    fn from((target, result): (&TargetRef, &ReactionResult)) -> Self {
        Self {
            target_id: target.id.clone(),
            target_kind: target.kind,
            reaction: result.choice(),
            counts: result.counts.into(),
            changed: result.changed,
        }
    }
}

impl From<(&TargetRef, Option<&Reaction>)> for UserReactionResponse {
    fn from((target, reaction): (&TargetRef, Option<&Reaction>)) -> Self {
        Self {
            target_id: target.id.clone(),
            reaction: reaction.map(|r| r.reaction_type).into(),
            updated_at: reaction.map(|r| r.updated_at),
        }
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

fn post_response(post: &Post, viewer_reaction: Option<ReactionType>) -> PostResponse {
    PostResponse {
        id: post.id.clone(),
        forum_id: post.forum_id.clone(),
        author_id: post.author_id.clone(),
        title: post.title.clone(),
        content: post.content.clone(),
        counts: post.counts.into(),
        viewer_reaction,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        post_response(post, None)
    }
}

impl From<&PostAggregateView> for PostResponse {
    fn from(view: &PostAggregateView) -> Self {
        post_response(&view.post, view.viewer_reaction)
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

fn comment_response(comment: Comment, viewer_reaction: Option<ReactionType>) -> CommentResponse {
    CommentResponse {
        parent_id: comment.parent().map(str::to_string),
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        content: comment.content,
        counts: comment.counts.into(),
        viewer_reaction,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        comment_response(comment, None)
    }
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        comment_response(comment.clone(), None)
    }
}

impl From<CommentAggregateView> for CommentResponse {
    fn from(view: CommentAggregateView) -> Self {
        comment_response(view.comment, view.viewer_reaction)
    }
}

/// A node whose replies are still being converted
struct Frame {
    comment: CommentResponse,
    pending: std::vec::IntoIter<CommentNode>,
    done: Vec<CommentNodeResponse>,
}

impl Frame {
    fn open(node: CommentNode) -> Self {
        let CommentNode {
            comment,
            replies,
            viewer_reaction,
        } = node;
        Self {
            comment: comment_response(comment, viewer_reaction),
            pending: replies.into_iter(),
            done: Vec::new(),
        }
    }
}

/// Convert a comment forest, keeping reply order, without recursing per level
pub fn comment_tree_response(roots: Vec<CommentNode>) -> Vec<CommentNodeResponse> {
    let mut out = Vec::with_capacity(roots.len());

    for root in roots {
        let mut stack = vec![Frame::open(root)];
        while let Some(top) = stack.last_mut() {
            if let Some(child) = top.pending.next() {
                stack.push(Frame::open(child));
                continue;
            }
            let Some(frame) = stack.pop() else { break };
            let node = CommentNodeResponse {
                comment: frame.comment,
                replies: frame.done,
            };
            match stack.last_mut() {
                Some(parent) => parent.done.push(node),
                None => out.push(node),
            }
        }
    }

    out
}
