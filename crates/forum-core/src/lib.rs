//! # forum-core
//!
//! Domain layer containing entities, value objects, the comment tree builder,
//! and the store traits (ports) that the reaction coordinator runs against.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod comment_tree;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use comment_tree::{build_comment_tree, count_nodes, CommentNode, ViewerReactions};
pub use entities::{
    validate_comment_content, Comment, Post, Reaction, ReactionTransition, MAX_COMMENT_LENGTH,
};
pub use error::DomainError;
pub use traits::{
    CommentRepository, CounterStore, HealthCheck, PostRepository, ReactionStore,
    ReactionTransaction, RepoResult, TargetDirectory,
};
pub use value_objects::{ReactionChoice, ReactionCounts, ReactionType, TargetKind, TargetRef};
