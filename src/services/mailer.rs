//! Outbound email delivery.
//!
//! `SendGridMailer` is used when an API key is configured; otherwise the
//! `LogMailer` logs the recipient and subject and reports success.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::clients::sendgrid::SendGridClient;
use crate::config::EmailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

pub struct SendGridMailer {
    client: SendGridClient,
    from: String,
}

impl SendGridMailer {
    #[must_use]
    pub const fn new(client: SendGridClient, from: String) -> Self {
        Self { client, from }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        self.client
            .send(&self.from, &email.to, &email.subject, &email.text, &email.html)
            .await?;
        info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        info!(
            to = %email.to,
            subject = %email.subject,
            "Email delivery disabled, message not sent"
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &EmailConfig) -> Result<Arc<dyn Mailer>> {
    match &config.sendgrid_api_key {
        Some(key) => {
            let client = SendGridClient::new(key.clone(), config.sendgrid_api_url.clone())?;
            Ok(Arc::new(SendGridMailer::new(client, config.from_address.clone())))
        }
        None => {
            warn!("SendGrid API key not configured; email will be logged instead of sent");
            Ok(Arc::new(LogMailer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_log_mailer_keeps_body_out_of_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let email = OutgoingEmail {
            to: "ada@example.com".to_string(),
            subject: "Reset your password".to_string(),
            text: "https://folio.example/reset-password?token=deadbeef".to_string(),
            html: "<a href=\"https://folio.example/reset-password?token=deadbeef\">Reset</a>"
                .to_string(),
        };
        LogMailer.send(&email).await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ada@example.com"));
        assert!(output.contains("Reset your password"));
        assert!(!output.contains("deadbeef"));
    }

    #[test]
    fn test_mailer_from_config_without_key() {
        let config = EmailConfig::default();
        assert!(mailer_from_config(&config).is_ok());
    }
}
