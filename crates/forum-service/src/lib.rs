//! # forum-service
//!
//! Application layer: the reaction coordinator, comment thread operations, read-side
//! aggregate views, and the DTOs the HTTP layer serializes.

pub mod dto;
pub mod services;

pub use dto::{
    comment_tree_response, CommentNodeResponse, CommentResponse, CountsResponse,
    CreateCommentRequest, HealthChecks, HealthResponse, PostResponse, ReactionResponse,
    ReactionResultResponse, ReadinessResponse, SetReactionRequest, UpdateCommentRequest,
    UserReactionResponse,
};
pub use services::{
    CommentAggregateView, CommentService, PostAggregateView, PostService, ReactionResult,
    ReactionService, RetryPolicy, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
