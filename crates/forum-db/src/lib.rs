//! # forum-db
//!
//! Storage layer implementing the forum-core store traits.
//!
//! ## Overview
//!
//! - PostgreSQL via SQLx: connection pool, migrations, row models, entity mappers,
//!   and one adapter per trait. The reaction unit of work is a database transaction
//!   guarded by a per-(user, target) advisory lock.
//! - [`MemoryStore`]: an in-process adapter with the same transactional behavior, for
//!   tests and single-node development.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forum_db::{create_pool, run_migrations, DatabaseConfig, PgReactionStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool, "crates/forum-db/migrations").await?;
//!     let reactions = PgReactionStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgCommentRepository, PgCounterStore, PgHealthCheck, PgPostRepository, PgReactionStore,
};
