use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use tracing::{info, warn};

use super::{new_id, timestamp};
use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};
use crate::models::user::HostedProfile;
use crate::services::auth_service::normalize_email;

/// Fields for a new email/password account.
#[derive(Debug, Clone)]
pub struct NewLocalUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: &str) -> Result<Option<users::Model>> {
        Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    /// Inserts a local account. New accounts are never admins.
    pub async fn create_local(&self, user: NewLocalUser) -> Result<users::Model> {
        let now = timestamp();
        let active = users::ActiveModel {
            id: Set(new_id()),
            email: Set(Some(user.email)),
            password_hash: Set(Some(user.password_hash)),
            first_name: Set(Some(user.first_name)),
            last_name: Set(Some(user.last_name)),
            profile_image_url: Set(None),
            is_admin: Set(false),
            is_email_verified: Set(false),
            reset_password_token: Set(None),
            reset_password_expires: Set(None),
            last_login_at: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")
    }

    /// Creates or refreshes the account for a hosted-identity subject.
    pub async fn upsert_hosted(&self, profile: HostedProfile) -> Result<users::Model> {
        let now = timestamp();

        let email = profile
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty());

        // Email is unique; keep it off this row if a different account owns it.
        let email = match email {
            Some(email) => match self.find_by_email(&email).await? {
                Some(owner) if owner.id != profile.subject => {
                    warn!(
                        "Email {} already belongs to another account, not linking it to {}",
                        email, profile.subject
                    );
                    None
                }
                _ => Some(email),
            },
            None => None,
        };

        if let Some(existing) = self.get(&profile.subject).await? {
            let mut active: users::ActiveModel = existing.into();
            if email.is_some() {
                active.email = Set(email);
            }
            active.first_name = Set(profile.first_name);
            active.last_name = Set(profile.last_name);
            active.profile_image_url = Set(profile.profile_image_url);
            active.last_login_at = Set(Some(now.clone()));
            active.updated_at = Set(now);
            return active
                .update(&self.conn)
                .await
                .context("Failed to update hosted user");
        }

        let active = users::ActiveModel {
            id: Set(profile.subject.clone()),
            email: Set(email),
            password_hash: Set(None),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
            profile_image_url: Set(profile.profile_image_url),
            is_admin: Set(false),
            is_email_verified: Set(true),
            reset_password_token: Set(None),
            reset_password_expires: Set(None),
            last_login_at: Set(Some(now.clone())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let user = active
            .insert(&self.conn)
            .await
            .context("Failed to insert hosted user")?;
        info!("Created account for hosted subject {}", user.id);
        Ok(user)
    }

    pub async fn touch_last_login(&self, id: &str) -> Result<()> {
        let now = timestamp();
        Users::update_many()
            .col_expr(users::Column::LastLoginAt, Expr::value(now.clone()))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update last login")?;
        Ok(())
    }

    pub async fn save_reset_token(&self, id: &str, token: &str, expires_at: &str) -> Result<()> {
        Users::update_many()
            .col_expr(users::Column::ResetPasswordToken, Expr::value(token))
            .col_expr(users::Column::ResetPasswordExpires, Expr::value(expires_at))
            .col_expr(users::Column::UpdatedAt, Expr::value(timestamp()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to store reset token")?;
        Ok(())
    }

    /// Returns the user holding `token` if it has not expired.
    pub async fn find_by_reset_token(&self, token: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::ResetPasswordToken.eq(token))
            .filter(users::Column::ResetPasswordExpires.gt(timestamp()))
            .one(&self.conn)
            .await
            .context("Failed to query user by reset token")
    }

    /// Replaces the password and clears the token in one statement.
    /// Returns false when the token is unknown, expired or already used.
    pub async fn consume_reset_token(&self, token: &str, password_hash: &str) -> Result<bool> {
        let now = timestamp();
        let result = Users::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(
                users::Column::ResetPasswordToken,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                users::Column::ResetPasswordExpires,
                Expr::value(Option::<String>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(users::Column::ResetPasswordToken.eq(token))
            .filter(users::Column::ResetPasswordExpires.gt(now))
            .exec(&self.conn)
            .await
            .context("Failed to consume reset token")?;

        Ok(result.rows_affected > 0)
    }

    /// Returns false when no account has this email.
    pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(users::Column::IsAdmin, Expr::value(is_admin))
            .col_expr(users::Column::UpdatedAt, Expr::value(timestamp()))
            .filter(users::Column::Email.eq(email))
            .exec(&self.conn)
            .await
            .context("Failed to update admin flag")?;

        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// Without a config, the argon2 crate defaults are used.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Checks `password` against a PHC-format hash. Params are read from the hash itself.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a random reset token (64 character hex string)
#[must_use]
pub fn generate_reset_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22", Some(&fast_params())).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "hunter22").unwrap());
        assert!(!verify_password(&hash, "hunter23").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same", Some(&fast_params())).unwrap();
        let b = hash_password("same", Some(&fast_params())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("not-a-hash", "anything").is_err());
    }

    #[test]
    fn test_generate_reset_token() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_reset_token());
    }
}
