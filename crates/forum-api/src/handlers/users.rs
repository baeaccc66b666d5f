//! User handlers
//!
//! Endpoints scoped to the caller.

use axum::{extract::State, Json};
use forum_service::{PostResponse, PostService};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Posts the caller currently likes, most recently liked first
///
/// GET /users/@me/liked-posts
pub async fn get_liked_posts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let posts = service.liked_posts(&auth.user_id).await?;
    Ok(Json(posts.iter().map(PostResponse::from).collect()))
}
