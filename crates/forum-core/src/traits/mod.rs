//! Store and repository traits (ports)

mod repositories;

pub use repositories::{
    CommentRepository, CounterStore, HealthCheck, PostRepository, ReactionStore,
    ReactionTransaction, RepoResult, TargetDirectory,
};
