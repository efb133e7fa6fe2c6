//! OpenID Connect authorization-code client for the hosted login flow.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::config::HostedIdentityConfig;
use crate::models::user::HostedProfile;

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub end_session_endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfoClaims {
    sub: String,
    email: Option<String>,
    #[serde(alias = "given_name")]
    first_name: Option<String>,
    #[serde(alias = "family_name")]
    last_name: Option<String>,
    #[serde(alias = "picture")]
    profile_image_url: Option<String>,
}

impl From<UserInfoClaims> for HostedProfile {
    fn from(claims: UserInfoClaims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            profile_image_url: claims.profile_image_url,
        }
    }
}

pub struct OidcClient {
    client: Client,
    issuer_url: String,
    client_id: String,
    client_secret: Option<String>,
    redirect_url: String,
    scopes: Vec<String>,
    metadata: OnceCell<ProviderMetadata>,
}

impl OidcClient {
    /// Returns `None` when no provider is configured.
    pub fn from_config(config: &HostedIdentityConfig) -> Result<Option<Self>> {
        let (Some(issuer_url), Some(client_id)) = (&config.issuer_url, &config.client_id) else {
            return Ok(None);
        };

        let client = Client::builder()
            .user_agent("Folio/1.0")
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .context("Failed to build OIDC HTTP client")?;

        Ok(Some(Self {
            client,
            issuer_url: issuer_url.trim_end_matches('/').to_string(),
            client_id: client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            scopes: config.scopes.clone(),
            metadata: OnceCell::new(),
        }))
    }

    /// Discovery document, fetched once and cached.
    async fn metadata(&self) -> Result<&ProviderMetadata> {
        self.metadata
            .get_or_try_init(|| async {
                let url = format!("{}/.well-known/openid-configuration", self.issuer_url);
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .context("OIDC discovery request failed")?;

                if !response.status().is_success() {
                    let status = response.status();
                    return Err(anyhow::anyhow!("OIDC discovery error: {status}"));
                }

                response
                    .json::<ProviderMetadata>()
                    .await
                    .context("Invalid OIDC discovery document")
            })
            .await
    }

    pub async fn authorize_url(&self, state: &str) -> Result<String> {
        let metadata = self.metadata().await?;
        build_authorize_url(
            &metadata.authorization_endpoint,
            &self.client_id,
            &self.redirect_url,
            &self.scopes,
            state,
        )
    }

    /// Exchanges an authorization code and fetches the user's profile.
    pub async fn fetch_profile(&self, code: &str) -> Result<HostedProfile> {
        let metadata = self.metadata().await?;

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_url.as_str()),
            ("client_id", self.client_id.as_str()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let response = self
            .client
            .post(&metadata.token_endpoint)
            .form(&form)
            .send()
            .await
            .context("OIDC token request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OIDC token error: {} - {}", status, body));
        }

        let token: TokenResponse = response.json().await.context("Invalid token response")?;

        let response = self
            .client
            .get(&metadata.userinfo_endpoint)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("OIDC userinfo request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("OIDC userinfo error: {status}"));
        }

        let claims: UserInfoClaims = response.json().await.context("Invalid userinfo response")?;
        Ok(claims.into())
    }

    /// Provider logout URL, if the provider advertises one.
    pub async fn end_session_url(&self, post_logout_redirect: &str) -> Result<Option<String>> {
        let metadata = self.metadata().await?;
        let Some(endpoint) = &metadata.end_session_endpoint else {
            return Ok(None);
        };

        let mut url = url::Url::parse(endpoint).context("Invalid end_session_endpoint")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("post_logout_redirect_uri", post_logout_redirect);
        Ok(Some(url.to_string()))
    }
}

fn build_authorize_url(
    endpoint: &str,
    client_id: &str,
    redirect_url: &str,
    scopes: &[String],
    state: &str,
) -> Result<String> {
    let mut url = url::Url::parse(endpoint).context("Invalid authorization_endpoint")?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_url)
        .append_pair("scope", &scopes.join(" "))
        .append_pair("state", state);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_authorize_url() {
        let url = build_authorize_url(
            "https://id.example.com/auth",
            "folio",
            "http://localhost:5000/api/callback",
            &["openid".to_string(), "email".to_string()],
            "abc123",
        )
        .unwrap();

        let parsed = url::Url::parse(&url).unwrap();
        let pairs: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["client_id"], "folio");
        assert_eq!(pairs["redirect_uri"], "http://localhost:5000/api/callback");
        assert_eq!(pairs["scope"], "openid email");
        assert_eq!(pairs["state"], "abc123");
    }

    #[test]
    fn test_userinfo_claims_accept_standard_names() {
        let claims: UserInfoClaims = serde_json::from_str(
            r#"{"sub":"42","email":"a@b.c","given_name":"Ada","family_name":"L","picture":"http://img"}"#,
        )
        .unwrap();
        let profile = HostedProfile::from(claims);

        assert_eq!(profile.subject, "42");
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.last_name.as_deref(), Some("L"));
        assert_eq!(profile.profile_image_url.as_deref(), Some("http://img"));
    }

    #[test]
    fn test_disabled_without_issuer() {
        let config = HostedIdentityConfig::default();
        assert!(OidcClient::from_config(&config).unwrap().is_none());
    }
}
