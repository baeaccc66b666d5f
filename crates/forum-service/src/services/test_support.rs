//! Fixtures shared by the service tests

use std::sync::Arc;

use chrono::{Duration, Utc};
use forum_common::auth::JwtService;
use forum_core::{Comment, Post};
use forum_db::MemoryStore;

use super::{RetryPolicy, ServiceContext};

/// Post `p1` with a top-level comment `c1` by `author` and its reply `c2` by `other`
pub(crate) fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let base = Utc::now() - Duration::minutes(10);

    store.insert_post(Post::new("p1", "forum", "author", "Hello", "First post"));
    store.insert_post(Post::new("p2", "forum", "author", "Again", "Second post"));
    store.insert_comment(Comment::new("c1", "p1", "author", "top level").with_created_at(base));
    store.insert_comment(
        Comment::new("c2", "p1", "other", "a reply")
            .with_parent("c1")
            .with_created_at(base + Duration::minutes(1)),
    );
    store
}

pub(crate) fn context_with_policy(store: MemoryStore, policy: RetryPolicy) -> ServiceContext {
    ServiceContext::builder()
        .memory_store(store)
        .jwt_service(Arc::new(JwtService::new("test-secret")))
        .retry_policy(policy)
        .build()
        .unwrap()
}

pub(crate) fn context() -> (ServiceContext, MemoryStore) {
    let store = seeded_store();
    let ctx = context_with_policy(store.clone(), RetryPolicy::immediate(5));
    (ctx, store)
}
