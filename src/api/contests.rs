use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_contest;
use super::{ApiError, ApiJson, ApiResponse, AppState, MessageResponse};
use crate::entities::contests;
use crate::models::content::ContestInput;

pub async fn list_contests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<contests::Model>>>, ApiError> {
    let contests = state.store.contests().list().await?;
    Ok(Json(ApiResponse::success(contests)))
}

pub async fn get_contest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<contests::Model>>, ApiError> {
    let contest = state
        .store
        .contests()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contest", &id))?;
    Ok(Json(ApiResponse::success(contest)))
}

pub async fn create_contest(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<ContestInput>,
) -> Result<Json<ApiResponse<contests::Model>>, ApiError> {
    validate_contest(&input)?;
    let contest = state.store.contests().create(input).await?;
    Ok(Json(ApiResponse::success(contest)))
}

pub async fn update_contest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ContestInput>,
) -> Result<Json<ApiResponse<contests::Model>>, ApiError> {
    validate_contest(&input)?;
    let contest = state
        .store
        .contests()
        .update(&id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Contest", &id))?;
    Ok(Json(ApiResponse::success(contest)))
}

pub async fn delete_contest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if !state.store.contests().delete(&id).await? {
        return Err(ApiError::not_found("Contest", &id));
    }
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Contest deleted",
    ))))
}
