use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "folio-dev-secret-change-me";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub hosted_identity: HostedIdentityConfig,

    pub email: EmailConfig,

    pub digest: DigestConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads. 0 uses the number of CPU cores.
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/folio.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request.
    pub session_inactivity_minutes: i64,

    /// Public base URL of the frontend, used to build links in emails.
    pub frontend_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec![
                "http://localhost:5000".to_string(),
                "http://127.0.0.1:5000".to_string(),
            ],
            secure_cookies: true,
            session_inactivity_minutes: 7 * 24 * 60,
            frontend_url: "http://localhost:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,

    pub jwt_expiry_days: i64,

    pub reset_token_ttl_minutes: i64,

    /// Argon2 memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiry_days: 7,
            reset_token_ttl_minutes: 60,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

/// OpenID Connect provider used for the hosted login flow.
/// The flow is disabled unless `issuer_url` and `client_id` are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedIdentityConfig {
    pub issuer_url: Option<String>,

    pub client_id: Option<String>,

    pub client_secret: Option<String>,

    /// Absolute URL of `/api/callback` as registered with the provider.
    pub redirect_url: String,

    pub scopes: Vec<String>,
}

impl Default for HostedIdentityConfig {
    fn default() -> Self {
        Self {
            issuer_url: None,
            client_id: None,
            client_secret: None,
            redirect_url: "http://localhost:5000/api/callback".to_string(),
            scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "profile".to_string(),
            ],
        }
    }
}

impl HostedIdentityConfig {
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.issuer_url.is_some() && self.client_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Without a key, mail is written to the log instead of being sent.
    pub sendgrid_api_key: Option<String>,

    pub sendgrid_api_url: String,

    pub from_address: String,

    /// Recipient of contact notifications and the weekly digest.
    pub admin_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sendgrid_api_key: None,
            sendgrid_api_url: "https://api.sendgrid.com/v3/mail/send".to_string(),
            from_address: "noreply@folio.local".to_string(),
            admin_email: "admin@folio.local".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub enabled: bool,

    /// Six-field cron expression evaluated in UTC.
    pub cron_expression: String,

    pub window_days: i64,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_expression: "0 0 9 * * Mon".to_string(),
            window_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "folio".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `.env` and process environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            Ok(true)
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("folio").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".folio").join("config.toml"));
        }

        paths
    }

    /// Overrides file values with deployment variables. `lookup` is the environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("DATABASE_URL") {
            self.general.database_path = url;
        }
        if let Some(secret) = var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(key) = var("SENDGRID_API_KEY") {
            self.email.sendgrid_api_key = Some(key);
        }
        if let Some(url) = var("FRONTEND_URL") {
            self.server.frontend_url = url;
        }
        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {port}"),
            }
        }
        if let Some(email) = var("ADMIN_EMAIL") {
            self.email.admin_email = email;
        }
        if let Some(url) = var("OIDC_ISSUER_URL") {
            self.hosted_identity.issuer_url = Some(url);
        }
        if let Some(id) = var("OIDC_CLIENT_ID") {
            self.hosted_identity.client_id = Some(id);
        }
        if let Some(secret) = var("OIDC_CLIENT_SECRET") {
            self.hosted_identity.client_secret = Some(secret);
        }
        if let Some(url) = var("OIDC_REDIRECT_URL") {
            self.hosted_identity.redirect_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret cannot be empty");
        }

        if self.security.jwt_secret == DEV_JWT_SECRET {
            warn!("Using the built-in development JWT secret; set JWT_SECRET in production");
        }

        if self.security.jwt_expiry_days <= 0 {
            anyhow::bail!("jwt_expiry_days must be > 0");
        }

        if self.security.reset_token_ttl_minutes <= 0 {
            anyhow::bail!("reset_token_ttl_minutes must be > 0");
        }

        if self.digest.enabled && self.digest.cron_expression.trim().is_empty() {
            anyhow::bail!("Digest cron expression cannot be empty when the digest is enabled");
        }

        if self.digest.window_days <= 0 {
            anyhow::bail!("Digest window_days must be > 0");
        }

        if self.hosted_identity.is_enabled() {
            url::Url::parse(&self.hosted_identity.redirect_url)
                .context("Invalid hosted identity redirect URL")?;
        }

        url::Url::parse(&self.server.frontend_url).context("Invalid frontend URL")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.security.jwt_expiry_days, 7);
        assert_eq!(config.security.reset_token_ttl_minutes, 60);
        assert_eq!(config.digest.cron_expression, "0 0 9 * * Mon");
        assert!(!config.hosted_identity.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(toml_str.contains("[digest]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [email]
            admin_email = "me@example.com"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.email.admin_email, "me@example.com");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite:/tmp/other.db"),
            ("JWT_SECRET", "s3cret"),
            ("SENDGRID_API_KEY", "SG.key"),
            ("PORT", "8080"),
            ("OIDC_ISSUER_URL", "https://id.example.com"),
            ("OIDC_CLIENT_ID", "folio"),
            ("FRONTEND_URL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.general.database_path, "sqlite:/tmp/other.db");
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.email.sendgrid_api_key.as_deref(), Some("SG.key"));
        assert_eq!(config.server.port, 8080);
        assert!(config.hosted_identity.is_enabled());
        // Blank values leave the file value in place
        assert_eq!(config.server.frontend_url, "http://localhost:5000");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut config = Config::default();
        config.security.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }
}
