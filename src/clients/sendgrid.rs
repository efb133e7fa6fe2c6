use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    mime: &'static str,
    value: &'a str,
}

/// Minimal client for the SendGrid v3 `mail/send` endpoint.
pub struct SendGridClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl SendGridClient {
    pub fn new(api_key: String, api_url: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Folio/1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build SendGrid HTTP client")?;

        Ok(Self {
            client,
            api_key,
            api_url,
        })
    }

    pub async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<()> {
        let request = MailSendRequest {
            personalizations: [Personalization {
                to: [Address { email: to }],
            }],
            from: Address { email: from },
            subject,
            content: vec![
                Content {
                    mime: "text/plain",
                    value: text,
                },
                Content {
                    mime: "text/html",
                    value: html,
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("SendGrid request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("SendGrid API error: {} - {}", status, body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = MailSendRequest {
            personalizations: [Personalization {
                to: [Address {
                    email: "admin@example.com",
                }],
            }],
            from: Address {
                email: "noreply@example.com",
            },
            subject: "Hi",
            content: vec![Content {
                mime: "text/plain",
                value: "body",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["personalizations"][0]["to"][0]["email"],
            "admin@example.com"
        );
        assert_eq!(json["from"]["email"], "noreply@example.com");
        assert_eq!(json["content"][0]["type"], "text/plain");
    }
}
