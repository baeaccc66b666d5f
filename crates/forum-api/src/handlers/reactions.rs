//! Reaction handlers
//!
//! Set, read, count and list likes/dislikes on posts and comments. Post and comment routes
//! share one implementation per operation, parameterised by the target kind.

use axum::{
    extract::{Path, State},
    Json,
};
use forum_core::TargetRef;
use forum_service::{
    CountsResponse, ReactionResponse, ReactionResultResponse, ReactionService,
    SetReactionRequest, UserReactionResponse,
};

use crate::extractors::{AuthUser, CommentIdPath, PostIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

async fn set_reaction(
    state: &AppState,
    auth: &AuthUser,
    target: TargetRef,
    request: &SetReactionRequest,
) -> ApiResult<Json<ReactionResultResponse>> {
    let desired = request.choice()?;

    let service = ReactionService::new(state.service_context());
    let result = service.react(&auth.user_id, &target, desired).await?;
    Ok(Json(ReactionResultResponse::from((&target, &result))))
}

async fn get_reaction(
    state: &AppState,
    auth: &AuthUser,
    target: TargetRef,
) -> ApiResult<Json<UserReactionResponse>> {
    let service = ReactionService::new(state.service_context());
    let reaction = service.get_user_reaction(&auth.user_id, &target).await?;
    Ok(Json(UserReactionResponse::from((&target, reaction.as_ref()))))
}

async fn reaction_counts(state: &AppState, target: TargetRef) -> ApiResult<Json<CountsResponse>> {
    let service = ReactionService::new(state.service_context());
    let counts = service.get_counts(&target).await?;
    Ok(Json(counts.into()))
}

async fn list_reactions(
    state: &AppState,
    target: TargetRef,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let service = ReactionService::new(state.service_context());
    let reactions = service.list_target_reactions(&target).await?;
    Ok(Json(reactions.iter().map(ReactionResponse::from).collect()))
}

/// Set own reaction on a post
///
/// PUT /posts/{post_id}/reaction
pub async fn set_post_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
    ValidatedJson(request): ValidatedJson<SetReactionRequest>,
) -> ApiResult<Json<ReactionResultResponse>> {
    let target = TargetRef::post(path.post_id()?);
    set_reaction(&state, &auth, target, &request).await
}

/// Set own reaction on a comment
///
/// PUT /comments/{comment_id}/reaction
pub async fn set_comment_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(request): ValidatedJson<SetReactionRequest>,
) -> ApiResult<Json<ReactionResultResponse>> {
    let target = TargetRef::comment(path.comment_id()?);
    set_reaction(&state, &auth, target, &request).await
}

/// Get own reaction on a post
///
/// GET /posts/{post_id}/reaction
pub async fn get_post_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<UserReactionResponse>> {
    get_reaction(&state, &auth, TargetRef::post(path.post_id()?)).await
}

/// Get own reaction on a comment
///
/// GET /comments/{comment_id}/reaction
pub async fn get_comment_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<UserReactionResponse>> {
    get_reaction(&state, &auth, TargetRef::comment(path.comment_id()?)).await
}

/// List every reaction on a post
///
/// GET /posts/{post_id}/reactions
pub async fn list_post_reactions(
    State(state): State<AppState>,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    list_reactions(&state, TargetRef::post(path.post_id()?)).await
}

/// List every reaction on a comment
///
/// GET /comments/{comment_id}/reactions
pub async fn list_comment_reactions(
    State(state): State<AppState>,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    list_reactions(&state, TargetRef::comment(path.comment_id()?)).await
}

/// Like/dislike counters of a post
///
/// GET /posts/{post_id}/reaction-counts
pub async fn get_post_reaction_counts(
    State(state): State<AppState>,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<CountsResponse>> {
    reaction_counts(&state, TargetRef::post(path.post_id()?)).await
}

/// Like/dislike counters of a comment
///
/// GET /comments/{comment_id}/reaction-counts
pub async fn get_comment_reaction_counts(
    State(state): State<AppState>,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<CountsResponse>> {
    reaction_counts(&state, TargetRef::comment(path.comment_id()?)).await
}
