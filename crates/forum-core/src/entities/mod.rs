//! Domain entities - core business objects

mod comment;
mod post;
mod reaction;

pub use comment::{normalize_parent, validate_comment_content, Comment, MAX_COMMENT_LENGTH};
pub use post::Post;
pub use reaction::{Reaction, ReactionTransition};
