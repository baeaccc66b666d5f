//! Service context - dependency container for services
//!
//! Holds the store ports, the retry policy for reaction transactions, and the token
//! verifier used by the HTTP layer.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use forum_common::auth::JwtService;
use forum_common::ReactionConfig;
use forum_core::traits::{
    CommentRepository, CounterStore, HealthCheck, PostRepository, ReactionStore, TargetDirectory,
};
use forum_db::{
    MemoryStore, PgCommentRepository, PgCounterStore, PgHealthCheck, PgPool, PgPostRepository,
    PgReactionStore,
};

use super::error::{ServiceError, ServiceResult};

/// Bounded exponential backoff for conflicting reaction transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ReactionConfig::default())
    }
}

impl From<&ReactionConfig> for RetryPolicy {
    fn from(config: &ReactionConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_backoff: Duration::from_millis(config.base_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Upper bound of the delay after the given failed attempt (1-based)
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_backoff
            .saturating_mul(1u32 << shift)
            .min(self.max_backoff)
    }

    /// Delay before the next attempt: half the ceiling plus random jitter up to the other half
    pub fn backoff(&self, attempt: u32) -> Duration {
        let ceiling = self.ceiling(attempt);
        let half = ceiling / 2;
        let spread = u64::try_from((ceiling - half).as_micros()).unwrap_or(u64::MAX);
        if spread == 0 {
            return half;
        }
        half + Duration::from_micros(rand::thread_rng().gen_range(0..=spread))
    }
}

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - The reaction store and its unit of work
/// - Counter and target lookups
/// - Comment and post repositories
/// - JWT verification for the HTTP layer
#[derive(Clone)]
pub struct ServiceContext {
    // Stores
    reaction_store: Arc<dyn ReactionStore>,
    counter_store: Arc<dyn CounterStore>,
    target_directory: Arc<dyn TargetDirectory>,

    // Repositories
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostRepository>,

    // Health
    health_check: Arc<dyn HealthCheck>,

    // Services
    jwt_service: Arc<JwtService>,
    retry_policy: RetryPolicy,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Stores ===

    /// Get the reaction store
    pub fn reaction_store(&self) -> &dyn ReactionStore {
        self.reaction_store.as_ref()
    }

    /// Get the counter store
    pub fn counter_store(&self) -> &dyn CounterStore {
        self.counter_store.as_ref()
    }

    /// Get the target directory
    pub fn target_directory(&self) -> &dyn TargetDirectory {
        self.target_directory.as_ref()
    }

    // === Repositories ===

    /// Get the comment repository
    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the storage health probe
    pub fn health_check(&self) -> &dyn HealthCheck {
        self.health_check.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Retry policy for reaction transactions
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("stores", &"...")
            .field("repositories", &"...")
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    reaction_store: Option<Arc<dyn ReactionStore>>,
    counter_store: Option<Arc<dyn CounterStore>>,
    target_directory: Option<Arc<dyn TargetDirectory>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    health_check: Option<Arc<dyn HealthCheck>>,
    jwt_service: Option<Arc<JwtService>>,
    retry_policy: RetryPolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            reaction_store: None,
            counter_store: None,
            target_directory: None,
            comment_repo: None,
            post_repo: None,
            health_check: None,
            jwt_service: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Wire every port to one in-process store
    pub fn memory_store(self, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        self.reaction_store(store.clone())
            .counter_store(store.clone())
            .target_directory(store.clone())
            .comment_repo(store.clone())
            .post_repo(store.clone())
            .health_check(store)
    }

    /// Wire every port to the PostgreSQL adapters sharing `pool`
    pub fn postgres(self, pool: PgPool) -> Self {
        let counters = Arc::new(PgCounterStore::new(pool.clone()));
        self.reaction_store(Arc::new(PgReactionStore::new(pool.clone())))
            .counter_store(counters.clone())
            .target_directory(counters)
            .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
            .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
            .health_check(Arc::new(PgHealthCheck::new(pool)))
    }

    pub fn reaction_store(mut self, store: Arc<dyn ReactionStore>) -> Self {
        self.reaction_store = Some(store);
        self
    }

    pub fn counter_store(mut self, store: Arc<dyn CounterStore>) -> Self {
        self.counter_store = Some(store);
        self
    }

    pub fn target_directory(mut self, directory: Arc<dyn TargetDirectory>) -> Self {
        self.target_directory = Some(directory);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_check = Some(check);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            reaction_store: self
                .reaction_store
                .ok_or_else(|| ServiceError::validation("reaction_store is required"))?,
            counter_store: self
                .counter_store
                .ok_or_else(|| ServiceError::validation("counter_store is required"))?,
            target_directory: self
                .target_directory
                .ok_or_else(|| ServiceError::validation("target_directory is required"))?,
            comment_repo: self
                .comment_repo
                .ok_or_else(|| ServiceError::validation("comment_repo is required"))?,
            post_repo: self
                .post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            health_check: self
                .health_check
                .ok_or_else(|| ServiceError::validation("health_check is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            retry_policy: self.retry_policy,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
