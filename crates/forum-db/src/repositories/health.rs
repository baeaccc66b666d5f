//! Readiness probe against PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;

use forum_core::{HealthCheck, RepoResult};

use super::error::map_db_error;

/// Round-trips a trivial query through the pool
#[derive(Clone)]
pub struct PgHealthCheck {
    pool: PgPool,
}

impl PgHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
