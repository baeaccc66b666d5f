//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a request.

pub mod comment;
pub mod context;
pub mod error;
pub mod post;
pub mod reaction;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export all services for convenience
pub use comment::{CommentAggregateView, CommentService};
pub use context::{RetryPolicy, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use post::{PostAggregateView, PostService};
pub use reaction::{ReactionResult, ReactionService};
