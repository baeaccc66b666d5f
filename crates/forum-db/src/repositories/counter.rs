//! PostgreSQL implementation of CounterStore and TargetDirectory
//!
//! Counters live as `likes`/`dislikes` columns on the target rows themselves, so the
//! same lookup answers both "does this target exist" and "what are its counts".

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::{CounterStore, ReactionCounts, RepoResult, TargetDirectory, TargetRef};

use crate::models::CounterModel;

use super::error::{map_db_error, target_table};

/// PostgreSQL implementation of CounterStore
#[derive(Clone)]
pub struct PgCounterStore {
    pool: PgPool,
}

impl PgCounterStore {
    /// Create a new PgCounterStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterStore for PgCounterStore {
    #[instrument(skip(self))]
    async fn counts(&self, target: &TargetRef) -> RepoResult<Option<ReactionCounts>> {
        let sql = format!(
            "SELECT likes, dislikes FROM {} WHERE id = $1",
            target_table(target.kind)
        );

        let result = sqlx::query_as::<_, CounterModel>(&sql)
            .bind(&target.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(ReactionCounts::from))
    }
}

#[async_trait]
impl TargetDirectory for PgCounterStore {
    #[instrument(skip(self))]
    async fn exists(&self, target: &TargetRef) -> RepoResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            target_table(target.kind)
        );

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(&target.id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
