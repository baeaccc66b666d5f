//! Value objects - immutable types that represent domain concepts

mod counts;
mod reaction_type;
mod target;

pub use counts::ReactionCounts;
pub use reaction_type::{ReactionChoice, ReactionType};
pub use target::{TargetKind, TargetRef};
