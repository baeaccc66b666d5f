//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod post;
mod reaction;

pub use comment::CommentModel;
pub use post::{CounterModel, PostModel};
pub use reaction::ReactionModel;
