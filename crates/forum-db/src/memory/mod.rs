//! In-memory implementation of every store trait
//!
//! Used by the `memory` storage backend and by tests. It keeps the same transactional
//! contract as the PostgreSQL adapter:
//!
//! - `begin` serializes units of work per (user, target) pair with an async mutex
//! - writes are staged inside the transaction and applied under one write lock at
//!   commit, so a dropped or failed transaction leaves no trace
//! - counter adjustments are floored at zero
//!
//! Faults can be injected for tests: [`MemoryStore::inject_conflicts`] makes the next
//! commits fail with `TransactionConflict`, and [`MemoryStore::set_unavailable`] makes
//! every operation fail with `StoreUnavailable`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use forum_core::{
    Comment, CommentRepository, CounterStore, DomainError, HealthCheck, Post, PostRepository,
    Reaction, ReactionCounts, ReactionStore, ReactionTransaction, ReactionType, RepoResult,
    TargetDirectory, TargetKind, TargetRef,
};

/// (user, target kind, target id)
type PairKey = (String, TargetKind, String);

fn pair_key(user_id: &str, target: &TargetRef) -> PairKey {
    (user_id.to_string(), target.kind, target.id.clone())
}

fn reaction_key(reaction: &Reaction) -> PairKey {
    (
        reaction.user_id.clone(),
        reaction.target_kind,
        reaction.target_id.clone(),
    )
}

#[derive(Default)]
struct State {
    posts: HashMap<String, Post>,
    comments: HashMap<String, Comment>,
    reactions: HashMap<PairKey, Reaction>,
}

impl State {
    fn counts(&self, target: &TargetRef) -> Option<ReactionCounts> {
        match target.kind {
            TargetKind::Post => self.posts.get(&target.id).map(|p| p.counts),
            TargetKind::Comment => self.comments.get(&target.id).map(|c| c.counts),
        }
    }

    fn counts_mut(&mut self, target: &TargetRef) -> Option<&mut ReactionCounts> {
        match target.kind {
            TargetKind::Post => self.posts.get_mut(&target.id).map(|p| &mut p.counts),
            TargetKind::Comment => self.comments.get_mut(&target.id).map(|c| &mut c.counts),
        }
    }
}

#[derive(Default)]
struct Inner {
    state: RwLock<State>,
    pair_locks: DashMap<PairKey, Arc<Mutex<()>>>,
    pending_conflicts: AtomicU32,
    unavailable: AtomicBool,
}

impl Inner {
    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }

    /// Consume one injected conflict, if any remain
    fn take_conflict(&self) -> bool {
        self.pending_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Shared in-memory store. Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Insert or replace a post as-is
    pub fn insert_post(&self, post: Post) {
        self.inner.state.write().posts.insert(post.id.clone(), post);
    }

    /// Insert or replace a comment as-is, bypassing content rules
    pub fn insert_comment(&self, comment: Comment) {
        self.inner
            .state
            .write()
            .comments
            .insert(comment.id.clone(), comment);
    }

    /// Insert a reaction record without touching counters
    pub fn insert_reaction(&self, reaction: Reaction) {
        let key = reaction_key(&reaction);
        self.inner.state.write().reactions.insert(key, reaction);
    }

    /// Overwrite a target's counters; returns false if the target is unknown
    pub fn set_counts(&self, target: &TargetRef, counts: ReactionCounts) -> bool {
        match self.inner.state.write().counts_mut(target) {
            Some(slot) => {
                *slot = counts;
                true
            }
            None => false,
        }
    }

    /// Number of reaction records across all targets
    pub fn reaction_count(&self) -> usize {
        self.inner.state.read().reactions.len()
    }

    // =========================================================================
    // Fault injection
    // =========================================================================

    /// Make the next `n` commits fail with `TransactionConflict`
    pub fn inject_conflicts(&self, n: u32) {
        self.inner.pending_conflicts.store(n, Ordering::SeqCst);
    }

    /// Injected conflicts not yet consumed
    pub fn pending_conflicts(&self) -> u32 {
        self.inner.pending_conflicts.load(Ordering::SeqCst)
    }

    /// Take the store offline (or back online)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReactionStore for MemoryStore {
    async fn begin(
        &self,
        user_id: &str,
        target: &TargetRef,
    ) -> RepoResult<Box<dyn ReactionTransaction>> {
        self.inner.check_available()?;

        let lock = self
            .inner
            .pair_locks
            .entry(pair_key(user_id, target))
            .or_default()
            .clone();
        let guard = lock.lock_owned().await;

        Ok(Box::new(MemoryTransaction {
            inner: Arc::clone(&self.inner),
            _pair_guard: guard,
            overlay: HashMap::new(),
            staged: Vec::new(),
        }))
    }

    async fn find(&self, user_id: &str, target: &TargetRef) -> RepoResult<Option<Reaction>> {
        self.inner.check_available()?;
        let key = pair_key(user_id, target);
        Ok(self.inner.state.read().reactions.get(&key).cloned())
    }

    async fn find_by_target(&self, target: &TargetRef) -> RepoResult<Vec<Reaction>> {
        self.inner.check_available()?;
        let mut reactions: Vec<Reaction> = self
            .inner
            .state
            .read()
            .reactions
            .values()
            .filter(|r| r.target_id == target.id && r.target_kind == target.kind)
            .cloned()
            .collect();
        reactions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(reactions)
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        kind: TargetKind,
        reaction_type: Option<ReactionType>,
    ) -> RepoResult<Vec<Reaction>> {
        self.inner.check_available()?;
        let mut reactions: Vec<Reaction> = self
            .inner
            .state
            .read()
            .reactions
            .values()
            .filter(|r| r.user_id == user_id && r.target_kind == kind)
            .filter(|r| reaction_type.map_or(true, |t| r.reaction_type == t))
            .cloned()
            .collect();
        reactions.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.target_id.cmp(&b.target_id))
        });
        Ok(reactions)
    }

    async fn find_for_targets(
        &self,
        user_id: &str,
        kind: TargetKind,
        target_ids: &[String],
    ) -> RepoResult<Vec<Reaction>> {
        self.inner.check_available()?;
        let state = self.inner.state.read();
        Ok(target_ids
            .iter()
            .filter_map(|id| state.reactions.get(&(user_id.to_string(), kind, id.clone())))
            .cloned()
            .collect())
    }
}

enum StagedOp {
    Put(Reaction),
    Delete(PairKey),
    Adjust {
        target: TargetRef,
        field: ReactionType,
        delta: i64,
    },
}

/// Unit of work over the in-memory state. Holds the pair lock until dropped.
struct MemoryTransaction {
    inner: Arc<Inner>,
    _pair_guard: OwnedMutexGuard<()>,
    /// Reaction records written in this transaction (`None` = deleted)
    overlay: HashMap<PairKey, Option<Reaction>>,
    staged: Vec<StagedOp>,
}

#[async_trait]
impl ReactionTransaction for MemoryTransaction {
    async fn get_reaction(&mut self, user_id: &str, target: &TargetRef) -> RepoResult<Option<Reaction>> {
        self.inner.check_available()?;
        let key = pair_key(user_id, target);
        if let Some(staged) = self.overlay.get(&key) {
            return Ok(staged.clone());
        }
        Ok(self.inner.state.read().reactions.get(&key).cloned())
    }

    async fn put_reaction(&mut self, reaction: &Reaction) -> RepoResult<()> {
        self.inner.check_available()?;
        let key = reaction_key(reaction);
        self.overlay.insert(key, Some(reaction.clone()));
        self.staged.push(StagedOp::Put(reaction.clone()));
        Ok(())
    }

    async fn delete_reaction(&mut self, user_id: &str, target: &TargetRef) -> RepoResult<()> {
        self.inner.check_available()?;
        let key = pair_key(user_id, target);
        self.overlay.insert(key.clone(), None);
        self.staged.push(StagedOp::Delete(key));
        Ok(())
    }

    async fn adjust_counter(
        &mut self,
        target: &TargetRef,
        field: ReactionType,
        delta: i64,
    ) -> RepoResult<()> {
        self.inner.check_available()?;
        if self.inner.state.read().counts(target).is_none() {
            return Err(DomainError::target_not_found(target.kind, target.id.clone()));
        }
        self.staged.push(StagedOp::Adjust {
            target: target.clone(),
            field,
            delta,
        });
        Ok(())
    }

    async fn counts(&mut self, target: &TargetRef) -> RepoResult<ReactionCounts> {
        self.inner.check_available()?;
        let mut counts = self
            .inner
            .state
            .read()
            .counts(target)
            .ok_or_else(|| DomainError::target_not_found(target.kind, target.id.clone()))?;
        for op in &self.staged {
            if let StagedOp::Adjust {
                target: adjusted,
                field,
                delta,
            } = op
            {
                if adjusted == target {
                    counts.apply(*field, *delta);
                }
            }
        }
        Ok(counts)
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryTransaction {
            inner,
            _pair_guard,
            staged,
            ..
        } = *self;

        inner.check_available()?;
        if inner.take_conflict() {
            debug!("Injected transaction conflict");
            return Err(DomainError::TransactionConflict);
        }

        let mut state = inner.state.write();

        // the target may have been deleted since it was checked
        for op in &staged {
            if let StagedOp::Adjust { target, .. } = op {
                if state.counts(target).is_none() {
                    return Err(DomainError::target_not_found(target.kind, target.id.clone()));
                }
            }
        }

        for op in staged {
            match op {
                StagedOp::Put(reaction) => {
                    state.reactions.insert(reaction_key(&reaction), reaction);
                }
                StagedOp::Delete(key) => {
                    state.reactions.remove(&key);
                }
                StagedOp::Adjust {
                    target,
                    field,
                    delta,
                } => {
                    if let Some(counts) = state.counts_mut(&target) {
                        counts.apply(field, delta);
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn counts(&self, target: &TargetRef) -> RepoResult<Option<ReactionCounts>> {
        self.inner.check_available()?;
        Ok(self.inner.state.read().counts(target))
    }
}

#[async_trait]
impl TargetDirectory for MemoryStore {
    async fn exists(&self, target: &TargetRef) -> RepoResult<bool> {
        self.inner.check_available()?;
        Ok(self.inner.state.read().counts(target).is_some())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Comment>> {
        self.inner.check_available()?;
        Ok(self.inner.state.read().comments.get(id).cloned())
    }

    async fn list_by_post(&self, post_id: &str) -> RepoResult<Vec<Comment>> {
        self.inner.check_available()?;
        Ok(self
            .inner
            .state
            .read()
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        self.inner.check_available()?;
        let mut state = self.inner.state.write();
        if !state.posts.contains_key(&comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id.clone()));
        }
        if state.comments.contains_key(&comment.id) {
            return Err(DomainError::InternalError(format!(
                "duplicate comment id {}",
                comment.id
            )));
        }
        state.comments.insert(comment.id.clone(), comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        self.inner.check_available()?;
        let mut state = self.inner.state.write();
        let Some(existing) = state.comments.get_mut(&comment.id) else {
            return Err(DomainError::CommentNotFound(comment.id.clone()));
        };
        existing.content.clone_from(&comment.content);
        existing.updated_at = comment.updated_at;
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        self.inner.check_available()?;
        let mut state = self.inner.state.write();
        if state.comments.remove(id).is_none() {
            return Err(DomainError::CommentNotFound(id.to_string()));
        }
        state
            .reactions
            .retain(|_, r| !(r.target_id == id && r.target_kind == TargetKind::Comment));
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Post>> {
        self.inner.check_available()?;
        Ok(self.inner.state.read().posts.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Post>> {
        self.inner.check_available()?;
        let state = self.inner.state.read();
        Ok(ids
            .iter()
            .filter_map(|id| state.posts.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> RepoResult<()> {
        self.inner.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_post(Post::new("p1", "f1", "author", "Title", "Body"));
        store.insert_comment(Comment::new("c1", "p1", "author", "first"));
        store
    }

    async fn like(store: &MemoryStore, user: &str, target: &TargetRef) -> RepoResult<()> {
        let mut tx = store.begin(user, target).await?;
        tx.put_reaction(&Reaction::new(user, target, ReactionType::Like))
            .await?;
        tx.adjust_counter(target, ReactionType::Like, 1).await?;
        tx.commit().await
    }

    #[tokio::test]
    async fn test_commit_applies_all_writes() {
        let store = seeded();
        let target = TargetRef::post("p1");

        like(&store, "u1", &target).await.unwrap();

        assert_eq!(
            store.counts(&target).await.unwrap(),
            Some(ReactionCounts::new(1, 0))
        );
        assert!(store.find("u1", &target).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_dropped_transaction_applies_nothing() {
        let store = seeded();
        let target = TargetRef::post("p1");

        {
            let mut tx = store.begin("u1", &target).await.unwrap();
            tx.put_reaction(&Reaction::new("u1", &target, ReactionType::Like))
                .await
                .unwrap();
            tx.adjust_counter(&target, ReactionType::Like, 1).await.unwrap();
            // read-your-writes inside the transaction
            assert!(tx.get_reaction("u1", &target).await.unwrap().is_some());
            assert_eq!(tx.counts(&target).await.unwrap(), ReactionCounts::new(1, 0));
        }

        assert_eq!(store.counts(&target).await.unwrap(), Some(ReactionCounts::default()));
        assert!(store.find("u1", &target).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_injected_conflict_rolls_back() {
        let store = seeded();
        let target = TargetRef::comment("c1");
        store.inject_conflicts(1);

        let err = like(&store, "u1", &target).await.unwrap_err();
        assert!(matches!(err, DomainError::TransactionConflict));
        assert_eq!(store.pending_conflicts(), 0);
        assert_eq!(store.reaction_count(), 0);

        like(&store, "u1", &target).await.unwrap();
        assert_eq!(store.counts(&target).await.unwrap().unwrap().likes, 1);
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = seeded();
        store.set_unavailable(true);

        let err = store.begin("u1", &TargetRef::post("p1")).await.err().unwrap();
        assert!(err.is_unavailable());
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_adjust_unknown_target() {
        let store = seeded();
        let target = TargetRef::post("missing");
        let mut tx = store.begin("u1", &target).await.unwrap();
        let err = tx.adjust_counter(&target, ReactionType::Like, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound { .. }));
    }

    #[tokio::test]
    async fn test_counters_floor_at_zero() {
        let store = seeded();
        let target = TargetRef::post("p1");

        let mut tx = store.begin("u1", &target).await.unwrap();
        tx.adjust_counter(&target, ReactionType::Dislike, -1).await.unwrap();
        tx.adjust_counter(&target, ReactionType::Dislike, 1).await.unwrap();
        assert_eq!(tx.counts(&target).await.unwrap(), ReactionCounts::new(0, 1));
        tx.commit().await.unwrap();

        assert_eq!(store.counts(&target).await.unwrap(), Some(ReactionCounts::new(0, 1)));
    }

    #[tokio::test]
    async fn test_transaction_counts_of_unknown_target() {
        let store = seeded();
        let target = TargetRef::comment("missing");
        let mut tx = store.begin("u1", &target).await.unwrap();
        let err = tx.counts(&target).await.unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_begin_serializes_same_pair() {
        let store = seeded();
        let target = TargetRef::post("p1");

        let first = store.begin("u1", &target).await.unwrap();

        let contender = {
            let store = store.clone();
            let target = target.clone();
            tokio::spawn(async move { store.begin("u1", &target).await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        // a different user on the same target is not blocked
        let other = store.begin("u2", &target).await.unwrap();
        drop(other);

        drop(first);
        contender.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_delete_comment_removes_its_reactions() {
        let store = seeded();
        let comment = TargetRef::comment("c1");
        let post = TargetRef::post("p1");
        like(&store, "u1", &comment).await.unwrap();
        like(&store, "u1", &post).await.unwrap();

        CommentRepository::delete(&store, "c1").await.unwrap();

        assert!(store.find("u1", &comment).await.unwrap().is_none());
        assert!(store.find("u1", &post).await.unwrap().is_some());
        assert!(!store.exists(&comment).await.unwrap());
        assert!(matches!(
            CommentRepository::delete(&store, "c1").await,
            Err(DomainError::CommentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_comment_requires_post() {
        let store = seeded();
        let orphan = Comment::new("c2", "nope", "author", "text");
        assert!(matches!(
            store.create(&orphan).await,
            Err(DomainError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_user_filters_and_orders() {
        let store = seeded();
        store.insert_post(Post::new("p2", "f1", "author", "Second", "Body"));

        like(&store, "u1", &TargetRef::post("p1")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        like(&store, "u1", &TargetRef::post("p2")).await.unwrap();
        like(&store, "u1", &TargetRef::comment("c1")).await.unwrap();

        let liked = store
            .find_by_user("u1", TargetKind::Post, Some(ReactionType::Like))
            .await
            .unwrap();
        let ids: Vec<&str> = liked.iter().map(|r| r.target_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);

        let disliked = store
            .find_by_user("u1", TargetKind::Post, Some(ReactionType::Dislike))
            .await
            .unwrap();
        assert!(disliked.is_empty());
    }

    #[tokio::test]
    async fn test_post_and_comment_sharing_an_id_are_separate_targets() {
        let store = seeded();
        store.insert_comment(Comment::new("p1", "p1", "author", "same id as the post"));
        let post = TargetRef::post("p1");
        let comment = TargetRef::comment("p1");

        like(&store, "u1", &post).await.unwrap();

        let mut tx = store.begin("u1", &comment).await.unwrap();
        assert!(tx.get_reaction("u1", &comment).await.unwrap().is_none());
        tx.delete_reaction("u1", &comment).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.find("u1", &post).await.unwrap().is_some());
        assert!(store.find("u1", &comment).await.unwrap().is_none());

        like(&store, "u1", &comment).await.unwrap();
        assert_eq!(store.reaction_count(), 2);

        let ids = vec!["p1".to_string()];
        let on_comments = store
            .find_for_targets("u1", TargetKind::Comment, &ids)
            .await
            .unwrap();
        assert_eq!(on_comments.len(), 1);
        assert_eq!(on_comments[0].target_kind, TargetKind::Comment);
    }

    #[tokio::test]
    async fn test_seeding_helpers() {
        let store = seeded();
        let post = TargetRef::post("p1");

        store.insert_reaction(Reaction::new("u1", &post, ReactionType::Dislike));
        assert!(store.set_counts(&post, ReactionCounts::new(2, 3)));
        assert!(!store.set_counts(&TargetRef::post("missing"), ReactionCounts::new(1, 1)));

        assert_eq!(store.counts(&post).await.unwrap(), Some(ReactionCounts::new(2, 3)));
        let record = store.find("u1", &post).await.unwrap().unwrap();
        assert_eq!(record.reaction_type, ReactionType::Dislike);
    }
}
