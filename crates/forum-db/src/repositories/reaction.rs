//! PostgreSQL implementation of ReactionStore
//!
//! A unit of work is one database transaction. `begin` takes a transaction-scoped
//! advisory lock keyed on the (user, target) pair, so toggles for the same pair run one
//! after another while everything else proceeds in parallel. Counters are adjusted with
//! a single `UPDATE` so concurrent writers on the same target never lose an increment.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use forum_core::{
    DomainError, Reaction, ReactionCounts, ReactionStore, ReactionTransaction, ReactionType,
    RepoResult, TargetKind, TargetRef,
};

use crate::mappers::{reactions_from_rows, ReactionInsert};
use crate::models::{CounterModel, ReactionModel};

use super::error::{map_db_error, target_table};

const SELECT_REACTION: &str = r#"
    SELECT user_id, target_id, target_kind, reaction_type, created_at, updated_at
    FROM reactions
    WHERE user_id = $1 AND target_kind = $2 AND target_id = $3
"#;

/// PostgreSQL implementation of ReactionStore
#[derive(Clone)]
pub struct PgReactionStore {
    pool: PgPool,
}

impl PgReactionStore {
    /// Create a new PgReactionStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Lock key shared by every unit of work on one (user, target) pair
fn pair_lock_key(user_id: &str, target: &TargetRef) -> String {
    format!("{user_id}:{}:{}", target.kind, target.id)
}

/// Atomic, floored counter update for one (kind, field) combination
const fn counter_update_sql(kind: TargetKind, field: ReactionType) -> &'static str {
    match (kind, field) {
        (TargetKind::Post, ReactionType::Like) => {
            "UPDATE posts SET likes = GREATEST(likes + $1, 0) WHERE id = $2"
        }
        (TargetKind::Post, ReactionType::Dislike) => {
            "UPDATE posts SET dislikes = GREATEST(dislikes + $1, 0) WHERE id = $2"
        }
        (TargetKind::Comment, ReactionType::Like) => {
            "UPDATE comments SET likes = GREATEST(likes + $1, 0) WHERE id = $2"
        }
        (TargetKind::Comment, ReactionType::Dislike) => {
            "UPDATE comments SET dislikes = GREATEST(dislikes + $1, 0) WHERE id = $2"
        }
    }
}

#[async_trait]
impl ReactionStore for PgReactionStore {
    #[instrument(skip(self))]
    async fn begin(
        &self,
        user_id: &str,
        target: &TargetRef,
    ) -> RepoResult<Box<dyn ReactionTransaction>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(pair_lock_key(user_id, target))
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        debug!("Acquired pair lock");
        Ok(Box::new(PgReactionTransaction { tx }))
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: &str, target: &TargetRef) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(SELECT_REACTION)
            .bind(user_id)
            .bind(target.kind.as_str())
            .bind(&target.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_target(&self, target: &TargetRef) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT user_id, target_id, target_kind, reaction_type, created_at, updated_at
            FROM reactions
            WHERE target_id = $1 AND target_kind = $2
            ORDER BY created_at, user_id
            "#,
        )
        .bind(&target.id)
        .bind(target.kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        reactions_from_rows(results)
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        user_id: &str,
        kind: TargetKind,
        reaction_type: Option<ReactionType>,
    ) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT user_id, target_id, target_kind, reaction_type, created_at, updated_at
            FROM reactions
            WHERE user_id = $1
              AND target_kind = $2
              AND ($3::TEXT IS NULL OR reaction_type = $3)
            ORDER BY updated_at DESC, target_id
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(reaction_type.map(ReactionType::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        reactions_from_rows(results)
    }

    #[instrument(skip(self, target_ids), fields(targets = target_ids.len()))]
    async fn find_for_targets(
        &self,
        user_id: &str,
        kind: TargetKind,
        target_ids: &[String],
    ) -> RepoResult<Vec<Reaction>> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT user_id, target_id, target_kind, reaction_type, created_at, updated_at
            FROM reactions
            WHERE user_id = $1 AND target_kind = $2 AND target_id = ANY($3)
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(target_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        reactions_from_rows(results)
    }
}

/// One open database transaction holding the pair lock
pub(crate) struct PgReactionTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReactionTransaction for PgReactionTransaction {
    async fn get_reaction(&mut self, user_id: &str, target: &TargetRef) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(SELECT_REACTION)
            .bind(user_id)
            .bind(target.kind.as_str())
            .bind(&target.id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    async fn put_reaction(&mut self, reaction: &Reaction) -> RepoResult<()> {
        let insert = ReactionInsert::new(reaction);

        sqlx::query(
            r#"
            INSERT INTO reactions (user_id, target_id, target_kind, reaction_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, target_kind, target_id) DO UPDATE
            SET reaction_type = EXCLUDED.reaction_type,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(insert.user_id)
        .bind(insert.target_id)
        .bind(insert.target_kind)
        .bind(insert.reaction_type)
        .bind(reaction.created_at)
        .bind(reaction.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn delete_reaction(&mut self, user_id: &str, target: &TargetRef) -> RepoResult<()> {
        sqlx::query(
            "DELETE FROM reactions WHERE user_id = $1 AND target_kind = $2 AND target_id = $3",
        )
        .bind(user_id)
        .bind(target.kind.as_str())
        .bind(&target.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn adjust_counter(
        &mut self,
        target: &TargetRef,
        field: ReactionType,
        delta: i64,
    ) -> RepoResult<()> {
        let result = sqlx::query(counter_update_sql(target.kind, field))
            .bind(delta)
            .bind(&target.id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::target_not_found(target.kind, target.id.clone()));
        }

        Ok(())
    }

    async fn counts(&mut self, target: &TargetRef) -> RepoResult<ReactionCounts> {
        let sql = format!(
            "SELECT likes, dislikes FROM {} WHERE id = $1",
            target_table(target.kind)
        );

        sqlx::query_as::<_, CounterModel>(&sql)
            .bind(&target.id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?
            .map(ReactionCounts::from)
            .ok_or_else(|| DomainError::target_not_found(target.kind, target.id.clone()))
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
