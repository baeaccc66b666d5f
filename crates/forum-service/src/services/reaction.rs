//! Reaction service
//!
//! The coordinator for like/dislike toggles. Every toggle runs as one unit of work on
//! the reaction store: read the prior record, plan the transition, write the record and
//! the counter deltas, commit. A conflicting commit is retried with bounded backoff;
//! nothing is applied unless the whole unit commits.

use forum_core::{
    DomainError, Reaction, ReactionChoice, ReactionCounts, ReactionTransition, TargetRef,
};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outcome of a toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionResult {
    /// The user's record after the toggle
    pub reaction: Option<Reaction>,
    /// Target counters as of the toggle's own unit of work, read before its commit
    pub counts: ReactionCounts,
    /// Whether anything was written
    pub changed: bool,
}

impl ReactionResult {
    /// The user's current choice on the target
    pub fn choice(&self) -> ReactionChoice {
        self.reaction.as_ref().map(|r| r.reaction_type).into()
    }
}

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set the user's reaction on a target to `desired`
    ///
    /// Idempotent: asking for the state that already holds writes nothing.
    #[instrument(skip(self))]
    pub async fn react(
        &self,
        user_id: &str,
        target: &TargetRef,
        desired: ReactionChoice,
    ) -> ServiceResult<ReactionResult> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::validation("user id is required"));
        }

        let exists = self
            .ctx
            .target_directory()
            .exists(target)
            .await
            .map_err(|e| ServiceError::store("check target", user_id, target, e))?;
        if !exists {
            return Err(DomainError::target_not_found(target.kind, target.id.clone()).into());
        }

        let policy = self.ctx.retry_policy();
        let mut attempt = 1;
        let (reaction, counts, changed) = loop {
            match self.try_react(user_id, target, desired).await {
                Ok(outcome) => break outcome,
                Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                    let delay = policy.backoff(attempt);
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Reaction transaction conflicted, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    warn!(attempts = attempt, "Reaction retries exhausted");
                    return Err(ServiceError::store(
                        "react",
                        user_id,
                        target,
                        DomainError::ConflictRetryExhausted { attempts: attempt },
                    ));
                }
                // includes the target going away between the existence check and the write
                Err(e) => return Err(ServiceError::store("react", user_id, target, e)),
            }
        };

        Ok(ReactionResult {
            reaction,
            counts,
            changed,
        })
    }

    /// One unit of work. Dropping the transaction before commit rolls it back.
    async fn try_react(
        &self,
        user_id: &str,
        target: &TargetRef,
        desired: ReactionChoice,
    ) -> Result<(Option<Reaction>, ReactionCounts, bool), DomainError> {
        let mut tx = self.ctx.reaction_store().begin(user_id, target).await?;
        let prev = tx.get_reaction(user_id, target).await?;

        let transition = ReactionTransition::plan(prev.as_ref().map(|r| r.reaction_type), desired);
        let next = match transition {
            ReactionTransition::Unchanged => {
                debug!(desired = %desired, "Reaction already in desired state");
                let counts = tx.counts(target).await?;
                return Ok((prev, counts, false));
            }
            ReactionTransition::Create(reaction_type) => {
                let reaction = Reaction::new(user_id, target, reaction_type);
                tx.put_reaction(&reaction).await?;
                Some(reaction)
            }
            ReactionTransition::Remove(_) => {
                tx.delete_reaction(user_id, target).await?;
                None
            }
            ReactionTransition::Switch { to, .. } => {
                let mut reaction =
                    prev.unwrap_or_else(|| Reaction::new(user_id, target, to));
                reaction.switch_to(to);
                tx.put_reaction(&reaction).await?;
                Some(reaction)
            }
        };

        for (field, delta) in transition.counter_deltas() {
            tx.adjust_counter(target, field, delta).await?;
        }
        let counts = tx.counts(target).await?;
        tx.commit().await?;

        info!(transition = ?transition, "Reaction updated");
        Ok((next, counts, true))
    }

    /// The user's current reaction on a target, if any
    #[instrument(skip(self))]
    pub async fn get_user_reaction(
        &self,
        user_id: &str,
        target: &TargetRef,
    ) -> ServiceResult<Option<Reaction>> {
        self.ctx
            .reaction_store()
            .find(user_id, target)
            .await
            .map_err(|e| ServiceError::store("find reaction", user_id, target, e))
    }

    /// Current like/dislike counters of a target
    #[instrument(skip(self))]
    pub async fn get_counts(&self, target: &TargetRef) -> ServiceResult<ReactionCounts> {
        self.ctx
            .counter_store()
            .counts(target)
            .await
            .map_err(|e| ServiceError::store("read counters", "", target, e))?
            .ok_or_else(|| DomainError::target_not_found(target.kind, target.id.clone()).into())
    }

    /// Every reaction on a target, oldest first
    #[instrument(skip(self))]
    pub async fn list_target_reactions(&self, target: &TargetRef) -> ServiceResult<Vec<Reaction>> {
        let exists = self
            .ctx
            .target_directory()
            .exists(target)
            .await
            .map_err(|e| ServiceError::store("check target", "", target, e))?;
        if !exists {
            return Err(DomainError::target_not_found(target.kind, target.id.clone()).into());
        }

        self.ctx
            .reaction_store()
            .find_by_target(target)
            .await
            .map_err(|e| ServiceError::store("list reactions", "", target, e))
    }
}
