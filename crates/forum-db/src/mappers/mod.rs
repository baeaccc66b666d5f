//! Entity to model mappers
//!
//! Conversions between domain entities (forum-core) and database models.
//! - `From<Model> for Entity`: rows whose columns map one-to-one
//! - `TryFrom<Model> for Entity`: rows carrying enum columns stored as text

mod comment;
mod post;
mod reaction;

pub use reaction::ReactionInsert;
pub(crate) use reaction::reactions_from_rows;
