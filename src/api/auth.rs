use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{validate_email, validate_password, validate_required};
use super::{ApiError, ApiJson, ApiQuery, ApiResponse, AppState, MessageResponse};
use crate::models::user::User;
use crate::services::{AuthSession, SignUp};

/// Session key holding the signed-in user's id.
pub const SESSION_USER_KEY: &str = "user_id";

const OIDC_STATE_KEY: &str = "oidc_state";

const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with this email exists, you will receive a password reset link";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

// ============================================================================
// Identity resolution
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    Session,
    Token,
}

/// Authenticated caller, inserted into request extensions by the auth gates.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub source: AuthSource,
}

impl CurrentUser {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.user.id
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.is_admin
    }
}

/// Picks the user id for a request. A session user always wins; the bearer
/// token is only verified when the session carries no user.
pub fn resolve_user_id(
    session_user: Option<String>,
    bearer: Option<&str>,
    verify: impl FnOnce(&str) -> Option<String>,
) -> Option<(String, AuthSource)> {
    if let Some(id) = session_user {
        return Some((id, AuthSource::Session));
    }

    bearer
        .and_then(verify)
        .map(|id| (id, AuthSource::Token))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
) -> Result<CurrentUser, ApiError> {
    let session_user = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read session: {e}")))?;

    let (id, source) = resolve_user_id(session_user, extract_bearer(headers), |token| {
        state.auth.verify_token(token)
    })
    .ok_or_else(ApiError::unauthorized)?;

    // The account may have been removed after the session or token was issued.
    let user = state
        .auth
        .get_user(&id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    tracing::Span::current().record("user_id", user.id.as_str());

    Ok(CurrentUser { user, source })
}

// ============================================================================
// Middleware
// ============================================================================

/// Requires a signed-in user via session cookie or `Authorization: Bearer <jwt>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = authenticate(&state, &session, &headers).await?;
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

/// Like [`auth_middleware`] but also requires the admin flag. The user row is
/// read on every request, so revoking the flag takes effect immediately.
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = authenticate(&state, &session, &headers).await?;
    if !current.is_admin() {
        return Err(ApiError::admin_required());
    }
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

// ============================================================================
// Local account handlers
// ============================================================================

/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<SignUpRequest>,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    let email = validate_email(&payload.email)?.to_string();
    validate_password(&payload.password)?;
    let first_name = validate_required("First name", &payload.first_name)?.to_string();
    let last_name = validate_required("Last name", &payload.last_name)?.to_string();

    let session = state
        .auth
        .sign_up(SignUp {
            email,
            password: payload.password,
            first_name,
            last_name,
        })
        .await?;

    Ok(Json(ApiResponse::success(session)))
}

/// POST /auth/signin
pub async fn signin(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<SignInRequest>,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let session = state.auth.sign_in(&payload.email, &payload.password).await?;
    Ok(Json(ApiResponse::success(session)))
}

/// GET /auth/user
pub async fn current_user(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<User>> {
    Json(ApiResponse::success(current.user))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /auth/forgot-password
/// Answers identically whether or not the email is registered.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let email = validate_email(&payload.email)?;
    state.auth.forgot_password(email).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        FORGOT_PASSWORD_MESSAGE,
    ))))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validate_required("Token", &payload.token)?;
    validate_password(&payload.new_password)?;

    state
        .auth
        .reset_password(payload.token.trim(), &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password updated successfully",
    ))))
}

// ============================================================================
// Hosted identity handlers
// ============================================================================

fn hosted_disabled() -> ApiError {
    ApiError::NotFound("Hosted login is not configured".to_string())
}

/// GET /login
pub async fn hosted_login(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, ApiError> {
    let oidc = state.oidc.as_ref().ok_or_else(hosted_disabled)?;

    let login_state = uuid::Uuid::new_v4().simple().to_string();
    session
        .insert(OIDC_STATE_KEY, &login_state)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store login state: {e}")))?;

    let url = oidc
        .authorize_url(&login_state)
        .await
        .map_err(|e| ApiError::identity_provider(format!("{e:#}")))?;

    Ok(Redirect::to(&url).into_response())
}

/// GET /callback
pub async fn hosted_callback(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiQuery(query): ApiQuery<CallbackQuery>,
) -> Result<Response, ApiError> {
    let oidc = state.oidc.as_ref().ok_or_else(hosted_disabled)?;

    if let Some(error) = query.error {
        return Err(ApiError::Unauthorized(format!("Login was rejected: {error}")));
    }

    let expected = session
        .remove::<String>(OIDC_STATE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read session: {e}")))?;

    let (Some(code), Some(returned)) = (query.code, query.state) else {
        return Err(ApiError::validation("Missing code or state"));
    };
    if expected.as_deref() != Some(returned.as_str()) {
        return Err(ApiError::validation("Invalid login state"));
    }

    let profile = oidc
        .fetch_profile(&code)
        .await
        .map_err(|e| ApiError::identity_provider(format!("{e:#}")))?;

    let user = state.auth.complete_hosted_login(profile).await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_USER_KEY, &user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user_id = %user.id, "Hosted login completed");
    Ok(Redirect::to(&state.config.server.frontend_url).into_response())
}

/// GET /logout
pub async fn hosted_logout(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, ApiError> {
    let oidc = state.oidc.as_ref().ok_or_else(hosted_disabled)?;

    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;

    let frontend = &state.config.server.frontend_url;
    let target = match oidc.end_session_url(frontend).await {
        Ok(Some(url)) => url,
        Ok(None) => frontend.clone(),
        Err(e) => {
            tracing::warn!("Provider logout unavailable: {e:#}");
            frontend.clone()
        }
    };

    Ok(Redirect::to(&target).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn verify_known(token: &str) -> Option<String> {
        (token == "valid-token").then(|| "token-user".to_string())
    }

    #[test]
    fn test_session_wins_over_bearer() {
        let resolved = resolve_user_id(
            Some("session-user".to_string()),
            Some("valid-token"),
            verify_known,
        );
        assert_eq!(
            resolved,
            Some(("session-user".to_string(), AuthSource::Session))
        );
    }

    #[test]
    fn test_bearer_not_verified_when_session_present() {
        let resolved = resolve_user_id(Some("session-user".to_string()), Some("x"), |_| {
            panic!("token must not be checked when a session user exists")
        });
        assert_eq!(resolved.map(|(_, s)| s), Some(AuthSource::Session));
    }

    #[test]
    fn test_bearer_used_without_session() {
        let resolved = resolve_user_id(None, Some("valid-token"), verify_known);
        assert_eq!(resolved, Some(("token-user".to_string(), AuthSource::Token)));
    }

    #[test]
    fn test_invalid_bearer_without_session() {
        assert_eq!(resolve_user_id(None, Some("forged"), verify_known), None);
        assert_eq!(resolve_user_id(None, None, verify_known), None);
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }
}
