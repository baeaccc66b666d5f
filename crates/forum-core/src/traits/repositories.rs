//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.
//!
//! The reaction write path goes through [`ReactionTransaction`], a unit of work that
//! spans both the per-user reaction records and the per-target counters. Nothing else
//! in this module mutates counters.
//!
//! Reaction records are keyed by (user, target kind, target id): a post and a comment
//! that happen to share an id are different targets.

use async_trait::async_trait;

use crate::entities::{Comment, Post, Reaction};
use crate::error::DomainError;
use crate::value_objects::{ReactionCounts, ReactionType, TargetKind, TargetRef};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Store
// ============================================================================

/// One atomic read-modify-write over a reaction record and its target's counters.
///
/// Writes become visible only on [`commit`](ReactionTransaction::commit). Dropping the
/// transaction without committing discards every staged write.
#[async_trait]
pub trait ReactionTransaction: Send {
    /// Read the current reaction for (user, target) inside the transaction
    async fn get_reaction(&mut self, user_id: &str, target: &TargetRef) -> RepoResult<Option<Reaction>>;

    /// Insert or overwrite the reaction record
    async fn put_reaction(&mut self, reaction: &Reaction) -> RepoResult<()>;

    /// Remove the reaction record if present
    async fn delete_reaction(&mut self, user_id: &str, target: &TargetRef) -> RepoResult<()>;

    /// Atomically add `delta` to one counter of `target`, flooring at zero.
    ///
    /// Fails with `TargetNotFound` if the target does not exist.
    async fn adjust_counter(
        &mut self,
        target: &TargetRef,
        field: ReactionType,
        delta: i64,
    ) -> RepoResult<()>;

    /// Counters of `target` as this transaction sees them, its own adjustments included.
    ///
    /// Fails with `TargetNotFound` if the target does not exist.
    async fn counts(&mut self, target: &TargetRef) -> RepoResult<ReactionCounts>;

    /// Commit every staged write, or none of them
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Open a unit of work for (user, target).
    ///
    /// Concurrent units of work for the same pair are serialized: a second `begin`
    /// for the pair waits until the first one commits or is dropped.
    async fn begin(&self, user_id: &str, target: &TargetRef) -> RepoResult<Box<dyn ReactionTransaction>>;

    /// Find the reaction a user has on a target
    async fn find(&self, user_id: &str, target: &TargetRef) -> RepoResult<Option<Reaction>>;

    /// All reactions on a target, oldest first
    async fn find_by_target(&self, target: &TargetRef) -> RepoResult<Vec<Reaction>>;

    /// A user's reactions on one kind of target, optionally of one type, newest first
    async fn find_by_user(
        &self,
        user_id: &str,
        kind: TargetKind,
        reaction_type: Option<ReactionType>,
    ) -> RepoResult<Vec<Reaction>>;

    /// A user's reactions on targets of one kind, restricted to the given ids
    async fn find_for_targets(
        &self,
        user_id: &str,
        kind: TargetKind,
        target_ids: &[String],
    ) -> RepoResult<Vec<Reaction>>;
}

// ============================================================================
// Counter Store
// ============================================================================

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current counters for a target, `None` if the target does not exist
    async fn counts(&self, target: &TargetRef) -> RepoResult<Option<ReactionCounts>>;
}

// ============================================================================
// Target Directory
// ============================================================================

#[async_trait]
pub trait TargetDirectory: Send + Sync {
    /// Check that a post or comment exists
    async fn exists(&self, target: &TargetRef) -> RepoResult<bool>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Comment>>;

    /// All comments of a post, in no particular order
    async fn list_by_post(&self, post_id: &str) -> RepoResult<Vec<Comment>>;

    /// Create a new comment
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Update comment content
    async fn update(&self, comment: &Comment) -> RepoResult<()>;

    /// Permanently delete a comment together with the reactions on it
    async fn delete(&self, id: &str) -> RepoResult<()>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Post>>;

    /// Find several posts; missing ids are skipped
    async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Post>>;
}

// ============================================================================
// Health
// ============================================================================

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Round-trip to the backing store
    async fn ping(&self) -> RepoResult<()>;
}
