use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_faq;
use super::{ApiError, ApiJson, ApiResponse, AppState, MessageResponse};
use crate::entities::faqs;
use crate::models::content::FaqInput;

pub async fn list_faqs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<faqs::Model>>>, ApiError> {
    let faqs = state.store.faqs().list_visible().await?;
    Ok(Json(ApiResponse::success(faqs)))
}

pub async fn get_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<faqs::Model>>, ApiError> {
    let faq = state
        .store
        .faqs()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("FAQ", &id))?;
    Ok(Json(ApiResponse::success(faq)))
}

pub async fn create_faq(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<FaqInput>,
) -> Result<Json<ApiResponse<faqs::Model>>, ApiError> {
    validate_faq(&input)?;
    let faq = state.store.faqs().create(input).await?;
    Ok(Json(ApiResponse::success(faq)))
}

pub async fn update_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<FaqInput>,
) -> Result<Json<ApiResponse<faqs::Model>>, ApiError> {
    validate_faq(&input)?;
    let faq = state
        .store
        .faqs()
        .update(&id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("FAQ", &id))?;
    Ok(Json(ApiResponse::success(faq)))
}

pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if !state.store.faqs().delete(&id).await? {
        return Err(ApiError::not_found("FAQ", &id));
    }
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "FAQ deleted",
    ))))
}
