//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities and service views to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{CreateCommentRequest, SetReactionRequest, UpdateCommentRequest};

// Re-export commonly used response types
pub use responses::{
    CommentNodeResponse, CommentResponse, CountsResponse, HealthChecks, HealthResponse,
    PostResponse, ReactionResponse, ReactionResultResponse, ReadinessResponse,
    UserReactionResponse,
};

pub use mappers::comment_tree_response;
