use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_blog_post, validate_comment};
use super::{ApiError, ApiJson, ApiQuery, ApiResponse, AppState, MessageResponse};
use crate::models::content::{BlogPostInput, BlogPostView, CommentInput, CommentView, LikeCount};

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub published: Option<bool>,
}

// ============================================================================
// Posts
// ============================================================================

/// GET /blog/posts?published=true
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PostListQuery>,
) -> Result<Json<ApiResponse<Vec<BlogPostView>>>, ApiError> {
    let posts = state.store.blog_posts().list(query.published).await?;
    Ok(Json(ApiResponse::success(posts)))
}

/// GET /blog/posts/{id}
/// Counts a view before returning the post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BlogPostView>>, ApiError> {
    let repo = state.store.blog_posts();
    if !repo.increment_views(&id).await? {
        return Err(ApiError::not_found("Blog post", &id));
    }

    let post = repo
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post", &id))?;
    Ok(Json(ApiResponse::success(post)))
}

/// GET /blog/posts/slug/{slug}
pub async fn get_post_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<BlogPostView>>, ApiError> {
    let post = state
        .store
        .blog_posts()
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post", &slug))?;
    Ok(Json(ApiResponse::success(post)))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(input): ApiJson<BlogPostInput>,
) -> Result<Json<ApiResponse<BlogPostView>>, ApiError> {
    validate_blog_post(&input)?;

    let repo = state.store.blog_posts();
    if repo.slug_taken(&input.slug, None).await? {
        return Err(ApiError::Conflict(format!(
            "A post with slug '{}' already exists",
            input.slug
        )));
    }

    let post = repo.create(input, current.id()).await?;
    tracing::info!(post_id = %post.post.id, "Blog post created");
    Ok(Json(ApiResponse::success(post)))
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<BlogPostInput>,
) -> Result<Json<ApiResponse<BlogPostView>>, ApiError> {
    validate_blog_post(&input)?;

    let repo = state.store.blog_posts();
    if repo.slug_taken(&input.slug, Some(&id)).await? {
        return Err(ApiError::Conflict(format!(
            "A post with slug '{}' already exists",
            input.slug
        )));
    }

    let post = repo
        .update(&id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post", &id))?;
    Ok(Json(ApiResponse::success(post)))
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if !state.store.blog_posts().delete(&id).await? {
        return Err(ApiError::not_found("Blog post", &id));
    }
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Blog post deleted",
    ))))
}

/// POST /blog/posts/{id}/like
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeCount>>, ApiError> {
    let likes = state
        .store
        .blog_posts()
        .increment_likes(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post", &id))?;
    Ok(Json(ApiResponse::success(LikeCount { likes })))
}

// ============================================================================
// Comments
// ============================================================================

/// GET /blog/posts/{id}/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, ApiError> {
    let comments = state.store.comments().list_for_post(&post_id).await?;
    Ok(Json(ApiResponse::success(comments)))
}

/// POST /blog/posts/{id}/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(post_id): Path<String>,
    ApiJson(input): ApiJson<CommentInput>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    validate_comment(&input)?;

    if state.store.blog_posts().get(&post_id).await?.is_none() {
        return Err(ApiError::not_found("Blog post", &post_id));
    }

    if let Some(parent_id) = &input.parent_id {
        let parent = state.store.comments().get(parent_id).await?;
        if parent.is_none_or(|p| p.comment.post_id != post_id) {
            return Err(ApiError::validation(
                "Parent comment does not belong to this post",
            ));
        }
    }

    let comment = state
        .store
        .comments()
        .create(&post_id, current.id(), input)
        .await?;
    Ok(Json(ApiResponse::success(comment)))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if !state.store.comments().delete(&id).await? {
        return Err(ApiError::not_found("Comment", &id));
    }
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Comment deleted",
    ))))
}

/// POST /comments/{id}/like
pub async fn like_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LikeCount>>, ApiError> {
    let likes = state
        .store
        .comments()
        .increment_likes(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment", &id))?;
    Ok(Json(ApiResponse::success(LikeCount { likes })))
}
