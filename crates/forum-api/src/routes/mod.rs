//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{comments, health, posts, reactions, users};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(post_routes())
        .merge(comment_routes())
        .merge(user_routes())
}

/// Post routes
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/:post_id", get(posts::get_post))
        // Reactions
        .route(
            "/posts/:post_id/reaction",
            put(reactions::set_post_reaction).get(reactions::get_post_reaction),
        )
        .route("/posts/:post_id/reactions", get(reactions::list_post_reactions))
        .route(
            "/posts/:post_id/reaction-counts",
            get(reactions::get_post_reaction_counts),
        )
        // Comments
        .route(
            "/posts/:post_id/comments",
            get(posts::get_comment_tree).post(posts::create_comment),
        )
}

/// Comment routes
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/:comment_id",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/comments/:comment_id/replies", post(comments::create_reply))
        // Reactions
        .route(
            "/comments/:comment_id/reaction",
            put(reactions::set_comment_reaction).get(reactions::get_comment_reaction),
        )
        .route(
            "/comments/:comment_id/reactions",
            get(reactions::list_comment_reactions),
        )
        .route(
            "/comments/:comment_id/reaction-counts",
            get(reactions::get_comment_reaction_counts),
        )
}

/// Routes scoped to the caller
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/@me/liked-posts", get(users::get_liked_posts))
}
