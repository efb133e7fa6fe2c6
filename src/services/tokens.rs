//! Bearer tokens for the local email/password flow.
//!
//! Tokens are HS256-signed JWTs whose `sub` claim is the user id.

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry: Duration::days(config.jwt_expiry_days),
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to sign token: {e}"))
    }

    /// Returns the user id for a valid, unexpired token.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<String> {
        let validation = Validation::new(JWT_ALGORITHM);
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, days: i64) -> TokenService {
        TokenService::new(&SecurityConfig {
            jwt_secret: secret.to_string(),
            jwt_expiry_days: days,
            ..SecurityConfig::default()
        })
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service("secret", 7);
        let token = tokens.issue("user-1").unwrap();
        assert_eq!(tokens.verify(&token).as_deref(), Some("user-1"));
    }

    #[test]
    fn test_rejects_other_secret() {
        let token = service("secret", 7).issue("user-1").unwrap();
        assert!(service("other", 7).verify(&token).is_none());
    }

    #[test]
    fn test_rejects_expired_token() {
        // Well past the default 60s leeway
        let token = service("secret", -1).issue("user-1").unwrap();
        assert!(service("secret", 7).verify(&token).is_none());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(service("secret", 7).verify("not.a.jwt").is_none());
    }
}
