//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in forum-core.

mod comment;
mod counter;
mod error;
mod health;
mod post;
mod reaction;

pub use comment::PgCommentRepository;
pub use counter::PgCounterStore;
pub use error::map_db_error;
pub use health::PgHealthCheck;
pub use post::PgPostRepository;
pub use reaction::PgReactionStore;
