//! Comment handlers
//!
//! Replies, single-comment views, edits and deletes.

use axum::{
    extract::{Path, State},
    Json,
};
use forum_service::{CommentResponse, CommentService, CreateCommentRequest, UpdateCommentRequest};

use crate::extractors::{AuthUser, CommentIdPath, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Reply to a comment
///
/// POST /comments/{comment_id}/replies
pub async fn create_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let reply = service
        .create_reply(path.comment_id()?, &auth.user_id, &request.content)
        .await?;
    Ok(Created(Json(CommentResponse::from(reply))))
}

/// Get a comment with the caller's reaction
///
/// GET /comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let view = service
        .get_comment_view(path.comment_id()?, viewer.user_id())
        .await?;
    Ok(Json(CommentResponse::from(view)))
}

/// Edit own comment
///
/// PATCH /comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .update_comment(path.comment_id()?, &auth.user_id, &request.content)
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}

/// Delete own comment
///
/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<NoContent> {
    let service = CommentService::new(state.service_context());
    service
        .delete_comment(path.comment_id()?, &auth.user_id)
        .await?;
    Ok(NoContent)
}
