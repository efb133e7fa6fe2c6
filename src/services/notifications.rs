use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::entities::contact_messages;
use crate::services::email_templates::{self, RenderedEmail};
use crate::services::mailer::{Mailer, OutgoingEmail};

/// Renders and delivers the application's emails through a [`Mailer`].
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    admin_email: String,
    frontend_url: String,
    reset_ttl_minutes: i64,
}

impl NotificationService {
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, config: &Config) -> Self {
        Self {
            mailer,
            admin_email: config.email.admin_email.clone(),
            frontend_url: config.server.frontend_url.trim_end_matches('/').to_string(),
            reset_ttl_minutes: config.security.reset_token_ttl_minutes,
        }
    }

    async fn deliver(&self, to: &str, rendered: RenderedEmail) -> Result<()> {
        self.mailer
            .send(&OutgoingEmail {
                to: to.to_string(),
                subject: rendered.subject,
                text: rendered.text,
                html: rendered.html,
            })
            .await
    }

    #[must_use]
    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/reset-password?token={}",
            self.frontend_url,
            urlencoding::encode(token)
        )
    }

    /// Tells the admin about a new contact message. Failures are logged only.
    pub async fn contact_received(&self, message: &contact_messages::Model) {
        let rendered = email_templates::contact_notification(message);
        match self.deliver(&self.admin_email, rendered).await {
            Ok(()) => info!(message_id = %message.id, "Contact notification sent"),
            Err(e) => warn!(
                message_id = %message.id,
                "Failed to send contact notification: {e:#}"
            ),
        }
    }

    pub async fn password_reset(&self, to: &str, token: &str) -> Result<()> {
        let rendered = email_templates::password_reset(&self.reset_link(token), self.reset_ttl_minutes);
        self.deliver(to, rendered).await
    }

    pub async fn weekly_digest(
        &self,
        messages: &[contact_messages::Model],
        week_start: &str,
        week_end: &str,
    ) -> Result<()> {
        let rendered = email_templates::weekly_digest(messages, week_start, week_end);
        self.deliver(&self.admin_email, rendered).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::LogMailer;

    #[test]
    fn test_reset_link() {
        let mut config = Config::default();
        config.server.frontend_url = "https://folio.example/".to_string();
        let service = NotificationService::new(Arc::new(LogMailer), &config);

        assert_eq!(
            service.reset_link("abc123"),
            "https://folio.example/reset-password?token=abc123"
        );
    }
}
