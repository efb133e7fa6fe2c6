use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_section;
use super::{ApiError, ApiJson, ApiResponse, AppState, MessageResponse};
use crate::entities::portfolio_sections;
use crate::models::content::PortfolioSectionInput;

pub async fn list_sections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<portfolio_sections::Model>>>, ApiError> {
    let sections = state.store.portfolio_sections().list().await?;
    Ok(Json(ApiResponse::success(sections)))
}

pub async fn get_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<portfolio_sections::Model>>, ApiError> {
    let section = state
        .store
        .portfolio_sections()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio section", &id))?;
    Ok(Json(ApiResponse::success(section)))
}

pub async fn create_section(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<PortfolioSectionInput>,
) -> Result<Json<ApiResponse<portfolio_sections::Model>>, ApiError> {
    validate_section(&input)?;
    let section = state.store.portfolio_sections().create(input).await?;
    Ok(Json(ApiResponse::success(section)))
}

pub async fn update_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PortfolioSectionInput>,
) -> Result<Json<ApiResponse<portfolio_sections::Model>>, ApiError> {
    validate_section(&input)?;
    let section = state
        .store
        .portfolio_sections()
        .update(&id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio section", &id))?;
    Ok(Json(ApiResponse::success(section)))
}

pub async fn delete_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if !state.store.portfolio_sections().delete(&id).await? {
        return Err(ApiError::not_found("Portfolio section", &id));
    }
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Portfolio section deleted",
    ))))
}

/// PATCH /portfolio/sections/{id}/toggle-visibility
pub async fn toggle_visibility(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<portfolio_sections::Model>>, ApiError> {
    let section = state
        .store
        .portfolio_sections()
        .toggle_visibility(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio section", &id))?;
    Ok(Json(ApiResponse::success(section)))
}
