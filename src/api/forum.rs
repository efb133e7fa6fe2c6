use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_forum_post, validate_forum_reply};
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::content::{ForumPostInput, ForumPostView, ForumReplyInput, ForumReplyView};

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ForumPostView>>>, ApiError> {
    let posts = state.store.forum_posts().list().await?;
    Ok(Json(ApiResponse::success(posts)))
}

/// GET /forum/posts/{id}
/// Counts a view before returning the post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ForumPostView>>, ApiError> {
    let repo = state.store.forum_posts();
    if !repo.increment_views(&id).await? {
        return Err(ApiError::not_found("Forum post", &id));
    }

    let post = repo
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Forum post", &id))?;
    Ok(Json(ApiResponse::success(post)))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(input): ApiJson<ForumPostInput>,
) -> Result<Json<ApiResponse<ForumPostView>>, ApiError> {
    validate_forum_post(&input)?;
    let post = state.store.forum_posts().create(input, current.id()).await?;
    Ok(Json(ApiResponse::success(post)))
}

/// GET /forum/posts/{id}/replies
pub async fn list_replies(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ForumReplyView>>>, ApiError> {
    let replies = state.store.forum_replies().list_for_post(&post_id).await?;
    Ok(Json(ApiResponse::success(replies)))
}

/// POST /forum/posts/{id}/replies
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(post_id): Path<String>,
    ApiJson(input): ApiJson<ForumReplyInput>,
) -> Result<Json<ApiResponse<ForumReplyView>>, ApiError> {
    validate_forum_reply(&input)?;

    if state.store.forum_posts().get(&post_id).await?.is_none() {
        return Err(ApiError::not_found("Forum post", &post_id));
    }

    let reply = state
        .store
        .forum_replies()
        .create(&post_id, current.id(), input)
        .await?;
    Ok(Json(ApiResponse::success(reply)))
}

/// PATCH /forum/replies/{id}/accept
/// Only the question's author or an admin may accept an answer.
pub async fn accept_reply(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ForumReplyView>>, ApiError> {
    let reply = state
        .store
        .forum_replies()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Forum reply", &id))?;

    let post_id = reply.reply.post_id.clone();
    let post = state
        .store
        .forum_posts()
        .get(&post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Forum post", &post_id))?;

    let is_author = post.post.author_id.as_deref() == Some(current.id());
    if !is_author && !current.is_admin() {
        return Err(ApiError::Forbidden(
            "Only the question author can accept an answer".to_string(),
        ));
    }

    let accepted = state
        .store
        .forum_replies()
        .accept(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Forum reply", &id))?;
    state.store.forum_posts().mark_answered(&post_id).await?;

    Ok(Json(ApiResponse::success(accepted)))
}
