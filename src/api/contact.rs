use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::{validate_contact, validate_email};
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::entities::contact_messages;
use crate::models::content::ContactMessageInput;

/// POST /contact
/// Stores the message, then notifies the admin. Delivery problems never fail the request.
pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    ApiJson(mut input): ApiJson<ContactMessageInput>,
) -> Result<Json<ApiResponse<contact_messages::Model>>, ApiError> {
    validate_contact(&input)?;
    input.name = input.name.trim().to_string();
    input.email = validate_email(&input.email)?.to_string();

    let message = state.store.contact_messages().create(input).await?;
    tracing::info!(message_id = %message.id, "Contact message received");

    state.notifications.contact_received(&message).await;

    Ok(Json(ApiResponse::success(message)))
}

/// GET /contact/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<contact_messages::Model>>>, ApiError> {
    let messages = state.store.contact_messages().list().await?;
    Ok(Json(ApiResponse::success(messages)))
}

/// PATCH /contact/messages/{id}/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<contact_messages::Model>>, ApiError> {
    let message = state
        .store
        .contact_messages()
        .mark_read(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact message", &id))?;
    Ok(Json(ApiResponse::success(message)))
}
