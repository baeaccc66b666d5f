//! Post handlers
//!
//! Read-side post view and the post's comment tree.

use axum::{
    extract::{Path, State},
    Json,
};
use forum_service::{
    comment_tree_response, CommentNodeResponse, CommentResponse, CommentService,
    CreateCommentRequest, PostResponse, PostService,
};

use crate::extractors::{AuthUser, OptionalAuthUser, PostIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Get post with counters and the caller's reaction
///
/// GET /posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<PostResponse>> {
    let service = PostService::new(state.service_context());
    let view = service
        .get_post_view(path.post_id()?, viewer.user_id())
        .await?;
    Ok(Json(PostResponse::from(&view)))
}

/// Get the post's comment tree
///
/// GET /posts/{post_id}/comments
pub async fn get_comment_tree(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<Vec<CommentNodeResponse>>> {
    let service = CommentService::new(state.service_context());
    let tree = service
        .build_comment_tree(path.post_id()?, viewer.user_id())
        .await?;
    Ok(Json(comment_tree_response(tree)))
}

/// Create a top-level comment
///
/// POST /posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .create_comment(path.post_id()?, &auth.user_id, &request.content)
        .await?;
    Ok(Created(Json(CommentResponse::from(comment))))
}
