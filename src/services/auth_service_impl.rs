//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::format_timestamp;
use crate::db::repositories::user::{
    NewLocalUser, generate_reset_token, hash_password, verify_password,
};
use crate::models::user::{HostedProfile, User};
use crate::services::auth_service::{AuthError, AuthService, AuthSession, SignUp, normalize_email};
use crate::services::notifications::NotificationService;
use crate::services::tokens::TokenService;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenService,
    notifications: Arc<NotificationService>,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        notifications: Arc<NotificationService>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            store,
            tokens: TokenService::new(&security),
            notifications,
            security,
        }
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let config = self.security.clone();
        let hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;
        Ok(hash)
    }

    async fn verify(&self, password_hash: String, password: &str) -> Result<bool, AuthError> {
        let password = password.to_string();
        let valid = task::spawn_blocking(move || verify_password(&password_hash, &password))
            .await
            .context("Password verification task panicked")??;
        Ok(valid)
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self.tokens.issue(&user.id)?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn sign_up(&self, request: SignUp) -> Result<AuthSession, AuthError> {
        let email = normalize_email(&request.email);
        let users = self.store.users();

        if users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hash(&request.password).await?;

        let user = users
            .create_local(NewLocalUser {
                email,
                password_hash,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
            })
            .await
            .map_err(|e| {
                // Lost a race with a concurrent sign-up for the same email
                if format!("{e:#}").contains("UNIQUE") {
                    AuthError::EmailTaken
                } else {
                    AuthError::from(e)
                }
            })?;

        info!(user_id = %user.id, "Registered local account");
        self.session_for(user.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);
        let users = self.store.users();

        let Some(user) = users.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        let Some(password_hash) = user.password_hash.clone() else {
            // Hosted-only account
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(password_hash, password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        users.touch_last_login(&user.id).await?;
        let user = users.get(&user.id).await?.unwrap_or(user);

        self.session_for(user.into())
    }

    fn verify_token(&self, token: &str) -> Option<String> {
        self.tokens.verify(token)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.users().get(id).await?.map(User::from))
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        let users = self.store.users();

        let Some(user) = users.find_by_email(&email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_reset_token();
        let expires = Utc::now() + Duration::minutes(self.security.reset_token_ttl_minutes);
        users
            .save_reset_token(&user.id, &token, &format_timestamp(expires))
            .await?;

        if let Err(e) = self.notifications.password_reset(&email, &token).await {
            warn!(user_id = %user.id, "Failed to send password reset email: {e:#}");
        }

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let users = self.store.users();

        if users.find_by_reset_token(token).await?.is_none() {
            return Err(AuthError::InvalidResetToken);
        }

        let password_hash = self.hash(new_password).await?;

        // The conditional update is what enforces single use
        if !users.consume_reset_token(token, &password_hash).await? {
            return Err(AuthError::InvalidResetToken);
        }

        info!("Password reset completed");
        Ok(())
    }

    async fn complete_hosted_login(&self, profile: HostedProfile) -> Result<User, AuthError> {
        let user = self.store.users().upsert_hosted(profile).await?;
        Ok(user.into())
    }
}
