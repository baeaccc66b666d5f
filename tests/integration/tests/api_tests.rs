//! API Integration Tests
//!
//! Each test starts the full router (middleware included) over its own seeded
//! in-memory store, so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_json, assert_status, fixtures::*, token_for, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_reports_unavailable_store() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.store.set_unavailable(true);

    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_set_reaction_without_token() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .put("/api/v1/posts/post-1/reaction", &SetReaction::like())
        .await
        .unwrap();

    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_set_reaction_with_bad_token() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", "not-a-jwt", &SetReaction::like())
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Post Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_like_then_unlike_post() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("u1");

    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::like())
        .await
        .unwrap();
    let result: ReactionResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result.target_id, "post-1");
    assert_eq!(result.target_kind, "post");
    assert_eq!(result.reaction, "like");
    assert_eq!(result.counts, Counts::new(1, 0));
    assert!(result.changed);

    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::none())
        .await
        .unwrap();
    let result: ReactionResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result.reaction, "none");
    assert_eq!(result.counts, Counts::new(0, 0));
    assert!(result.changed);
    assert_eq!(server.store.reaction_count(), 0);
}

#[tokio::test]
async fn test_repeated_like_is_idempotent() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("u1");

    for _ in 0..3 {
        server
            .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::like())
            .await
            .unwrap();
    }

    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::like())
        .await
        .unwrap();
    let result: ReactionResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!result.changed);
    assert_eq!(result.counts, Counts::new(1, 0));
}

#[tokio::test]
async fn test_switch_like_to_dislike() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("u1");

    server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::like())
        .await
        .unwrap();
    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::dislike())
        .await
        .unwrap();
    let result: ReactionResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result.counts, Counts::new(0, 1));

    let response = server
        .get_auth("/api/v1/posts/post-1/reaction", &token)
        .await
        .unwrap();
    let mine: UserReaction = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.target_id, "post-1");
    assert_eq!(mine.reaction, "dislike");
}

#[tokio::test]
async fn test_reaction_reads_are_per_user() {
    let server = TestServer::start().await.unwrap();
    server
        .put_auth("/api/v1/posts/post-1/reaction", &token_for("u1"), &SetReaction::like())
        .await
        .unwrap();

    let response = server
        .get_auth("/api/v1/posts/post-1/reaction", &token_for("u2"))
        .await
        .unwrap();
    let theirs: UserReaction = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(theirs.reaction, "none");
}

#[tokio::test]
async fn test_list_post_reactions() {
    let server = TestServer::start().await.unwrap();
    server
        .put_auth("/api/v1/posts/post-2/reaction", &token_for("u1"), &SetReaction::like())
        .await
        .unwrap();
    server
        .put_auth("/api/v1/posts/post-2/reaction", &token_for("u2"), &SetReaction::dislike())
        .await
        .unwrap();

    let response = server.get("/api/v1/posts/post-2/reactions").await.unwrap();
    let mut records: Vec<ReactionRecord> = assert_json(response, StatusCode::OK).await.unwrap();
    records.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].target_id, "post-2");
    assert_eq!(records[0].reaction_type, "like");
    assert_eq!(records[1].reaction_type, "dislike");
}

#[tokio::test]
async fn test_reaction_counts_route() {
    let server = TestServer::start().await.unwrap();
    server
        .put_auth("/api/v1/comments/comment-1/reaction", &token_for("u1"), &SetReaction::dislike())
        .await
        .unwrap();

    let response = server.get("/api/v1/comments/comment-1/reaction-counts").await.unwrap();
    let counts: Counts = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(counts, Counts::new(0, 1));

    let response = server.get("/api/v1/posts/post-2/reaction-counts").await.unwrap();
    let counts: Counts = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(counts, Counts::new(0, 0));

    let response = server.get("/api/v1/posts/missing/reaction-counts").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_invalid_reaction_value() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("u1");

    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::of("love"))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_REACTION_TYPE");

    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::of(""))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_react_to_unknown_post() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .put_auth("/api/v1/posts/missing/reaction", &token_for("u1"), &SetReaction::like())
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(server.store.reaction_count(), 0);
}

#[tokio::test]
async fn test_store_outage_returns_503() {
    let server = TestServer::start().await.unwrap();
    server.store.set_unavailable(true);

    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token_for("u1"), &SetReaction::like())
        .await
        .unwrap();
    assert_status(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_transient_conflicts_are_retried() {
    let server = TestServer::start().await.unwrap();
    server.store.inject_conflicts(3);

    let response = server
        .put_auth("/api/v1/posts/post-1/reaction", &token_for("u1"), &SetReaction::like())
        .await
        .unwrap();
    let result: ReactionResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result.counts, Counts::new(1, 0));
    assert_eq!(server.store.pending_conflicts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_converge() {
    let server = TestServer::start().await.unwrap();

    let requests = (0..40).map(|i| {
        let server = &server;
        async move {
            let choice = if i % 4 == 0 {
                SetReaction::dislike()
            } else {
                SetReaction::like()
            };
            server
                .put_auth(
                    "/api/v1/posts/post-1/reaction",
                    &token_for(&format!("user-{i}")),
                    &choice,
                )
                .await
        }
    });
    for response in join_all(requests).await {
        assert_status(response.unwrap(), StatusCode::OK).await.unwrap();
    }

    let response = server.get("/api/v1/posts/post-1").await.unwrap();
    let post: PostView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(post.counts, Counts::new(30, 10));
}

// ============================================================================
// Post View Tests
// ============================================================================

#[tokio::test]
async fn test_post_view_overlay() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("viewer");
    server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::like())
        .await
        .unwrap();

    let response = server.get_auth("/api/v1/posts/post-1", &token).await.unwrap();
    let post: PostView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(post.id, "post-1");
    assert_eq!(post.counts, Counts::new(1, 0));
    assert_eq!(post.viewer_reaction.as_deref(), Some("like"));

    let response = server.get("/api/v1/posts/post-1").await.unwrap();
    let post: PostView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(post.viewer_reaction, None);
}

#[tokio::test]
async fn test_unknown_post() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/posts/missing").await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert!(!body.error.message.is_empty());
}

#[tokio::test]
async fn test_liked_posts() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("u1");

    server
        .put_auth("/api/v1/posts/post-1/reaction", &token, &SetReaction::like())
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    server
        .put_auth("/api/v1/posts/post-2/reaction", &token, &SetReaction::like())
        .await
        .unwrap();
    server
        .put_auth("/api/v1/comments/comment-1/reaction", &token, &SetReaction::like())
        .await
        .unwrap();

    let response = server
        .get_auth("/api/v1/users/@me/liked-posts", &token)
        .await
        .unwrap();
    let liked: Vec<PostView> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<&str> = liked.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["post-2", "post-1"]);

    let response = server.get("/api/v1/users/@me/liked-posts").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Comment Tree Tests
// ============================================================================

#[tokio::test]
async fn test_comment_tree_with_viewer_overlay() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("viewer");
    server
        .put_auth("/api/v1/comments/comment-2/reaction", &token, &SetReaction::dislike())
        .await
        .unwrap();

    let response = server
        .get_auth("/api/v1/posts/post-1/comments", &token)
        .await
        .unwrap();
    let tree: Vec<CommentNode> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(tree.len(), 1);
    let root = &tree[0];
    assert_eq!(root.comment.id, "comment-1");
    assert_eq!(root.comment.parent_id, None);
    assert_eq!(root.comment.viewer_reaction, None);

    let reply = &root.replies[0];
    assert_eq!(reply.comment.id, "comment-2");
    assert_eq!(reply.comment.parent_id.as_deref(), Some("comment-1"));
    assert_eq!(reply.comment.counts, Counts::new(0, 1));
    assert_eq!(reply.comment.viewer_reaction.as_deref(), Some("dislike"));
    assert!(reply.replies.is_empty());

    let response = server.get("/api/v1/posts/post-1/comments").await.unwrap();
    let anonymous: Vec<CommentNode> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(anonymous[0].replies[0].comment.viewer_reaction, None);
}

#[tokio::test]
async fn test_comment_tree_of_empty_and_missing_posts() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/posts/post-2/comments").await.unwrap();
    let tree: Vec<CommentNode> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tree.is_empty());

    let response = server.get("/api/v1/posts/missing/comments").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_comment_reaction_round_trip() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("u1");

    let response = server
        .put_auth("/api/v1/comments/comment-1/reaction", &token, &SetReaction::like())
        .await
        .unwrap();
    let result: ReactionResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result.target_kind, "comment");
    assert_eq!(result.counts, Counts::new(1, 0));

    let response = server
        .get_auth("/api/v1/comments/comment-1", &token)
        .await
        .unwrap();
    let comment: CommentView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(comment.counts, Counts::new(1, 0));
    assert_eq!(comment.viewer_reaction.as_deref(), Some("like"));

    let response = server
        .get("/api/v1/comments/comment-1/reactions")
        .await
        .unwrap();
    let records: Vec<ReactionRecord> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(records.len(), 1);

    // post counters are untouched by comment reactions
    let response = server.get("/api/v1/posts/post-1").await.unwrap();
    let post: PostView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(post.counts, Counts::new(0, 0));
}

// ============================================================================
// Comment Write Tests
// ============================================================================

#[tokio::test]
async fn test_create_comment_and_reply() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("carol");

    let response = server
        .post_auth("/api/v1/posts/post-2/comments", &token, &CommentBody::new("nice post"))
        .await
        .unwrap();
    let comment: CommentView = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(comment.post_id, "post-2");
    assert_eq!(comment.author_id, "carol");
    assert_eq!(comment.counts, Counts::new(0, 0));

    let response = server
        .post_auth(
            &format!("/api/v1/comments/{}/replies", comment.id),
            &token_for("dave"),
            &CommentBody::new("agreed"),
        )
        .await
        .unwrap();
    let reply: CommentView = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reply.post_id, "post-2");
    assert_eq!(reply.parent_id.as_deref(), Some(comment.id.as_str()));

    let response = server.get("/api/v1/posts/post-2/comments").await.unwrap();
    let tree: Vec<CommentNode> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].replies[0].comment.content, "agreed");
}

#[tokio::test]
async fn test_create_comment_validation() {
    let server = TestServer::start().await.unwrap();
    let token = token_for("carol");

    let response = server
        .post_auth("/api/v1/posts/post-1/comments", &token, &CommentBody::new(""))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/posts/post-1/comments",
            &token,
            &CommentBody::new(&"x".repeat(501)),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth("/api/v1/comments/missing/replies", &token, &CommentBody::new("hi"))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_only_author_edits_comment() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .patch_auth(
            "/api/v1/comments/comment-1",
            &token_for("mallory"),
            &CommentBody::new("hijacked"),
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_COMMENT_AUTHOR");

    let response = server
        .patch_auth(
            "/api/v1/comments/comment-1",
            &token_for(THREAD_AUTHOR),
            &CommentBody::new("edited"),
        )
        .await
        .unwrap();
    let comment: CommentView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(comment.content, "edited");
}

#[tokio::test]
async fn test_delete_comment() {
    let server = TestServer::start().await.unwrap();
    server
        .put_auth("/api/v1/comments/comment-1/reaction", &token_for("u1"), &SetReaction::like())
        .await
        .unwrap();

    let response = server
        .delete_auth("/api/v1/comments/comment-1", &token_for("mallory"))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .delete_auth("/api/v1/comments/comment-1", &token_for(THREAD_AUTHOR))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    assert_eq!(server.store.reaction_count(), 0);

    let response = server.get("/api/v1/comments/comment-1").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    // the orphaned reply is no longer reachable from the tree
    let response = server.get("/api/v1/posts/post-1/comments").await.unwrap();
    let tree: Vec<CommentNode> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tree.is_empty());
}
