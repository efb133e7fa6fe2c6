//! Subject and body rendering for outgoing mail.
//!
//! Every user-supplied value is HTML-escaped before it reaches an HTML body.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::entities::contact_messages;

const GENERAL_INQUIRY: &str = "General Inquiry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

fn subject_or_default(subject: Option<&str>) -> &str {
    subject.filter(|s| !s.trim().is_empty()).unwrap_or(GENERAL_INQUIRY)
}

/// `created_at` rendered as a calendar day, falling back to the raw value.
fn display_date(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|d| d.with_timezone(&Utc).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

fn wrap(title: &str, inner: &str, footer: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 700px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px;">{title}</h2>
  {inner}
  <p style="color: #6c757d; font-size: 13px; margin-top: 30px;">{footer}</p>
</div>"#
    )
}

pub fn contact_notification(message: &contact_messages::Model) -> RenderedEmail {
    let subject_line = subject_or_default(message.subject.as_deref());
    let subject = format!("New Contact Form Submission: {subject_line}");

    let text = format!(
        "New Contact Form Submission\n\nName: {}\nEmail: {}\nSubject: {}\nSubmitted: {}\n\nMessage:\n{}\n",
        message.name, message.email, subject_line, message.created_at, message.message
    );

    let body = encode_text(&message.message).replace('\n', "<br>");
    let inner = format!(
        r"<table>
    <tr><td><b>Name:</b></td><td>{}</td></tr>
    <tr><td><b>Email:</b></td><td>{}</td></tr>
    <tr><td><b>Subject:</b></td><td>{}</td></tr>
    <tr><td><b>Submitted:</b></td><td>{}</td></tr>
  </table>
  <h3>Message:</h3>
  <p style='border-left: 4px solid #3498db; padding-left: 12px;'>{}</p>",
        encode_text(&message.name),
        encode_text(&message.email),
        encode_text(subject_line),
        encode_text(&message.created_at),
        body
    );

    RenderedEmail {
        subject,
        text,
        html: wrap(
            "New Contact Form Submission",
            &inner,
            "Sent from the portfolio contact form.",
        ),
    }
}

pub fn password_reset(reset_link: &str, ttl_minutes: i64) -> RenderedEmail {
    let text = format!(
        "We received a request to reset your password.\n\nOpen this link to choose a new one:\n{reset_link}\n\nThe link expires in {ttl_minutes} minutes. If you did not request this, ignore this email.\n"
    );

    let href = encode_double_quoted_attribute(reset_link);
    let shown = encode_text(reset_link);
    let inner = format!(
        r#"<p>We received a request to reset your password.</p>
  <p><a href="{href}">Reset your password</a></p>
  <p style="color: #666; font-size: 14px;">Or copy this link into your browser:<br>{shown}</p>"#
    );

    RenderedEmail {
        subject: "Reset your password".to_string(),
        text,
        html: wrap(
            "Password Reset",
            &inner,
            &format!(
                "The link expires in {ttl_minutes} minutes. If you did not request this, ignore this email."
            ),
        ),
    }
}

pub fn weekly_digest(
    messages: &[contact_messages::Model],
    week_start: &str,
    week_end: &str,
) -> RenderedEmail {
    let subject = format!("Weekly Contact Form Summary - {week_start} to {week_end}");
    let total = messages.len();
    let unread = messages.iter().filter(|m| !m.is_read).count();

    let mut text = format!(
        "Weekly Contact Form Summary - {week_start} to {week_end}\n\nSummary:\n- Total Submissions: {total}\n- Unread Messages: {unread}\n\n"
    );

    let inner = if messages.is_empty() {
        text.push_str("No contact form submissions received this week.\n");
        "<p>No contact form submissions received this week.</p>".to_string()
    } else {
        text.push_str("Contact Submissions:\n");
        let mut rows = String::new();
        for m in messages {
            let status = if m.is_read { "Read" } else { "Unread" };
            let subject_line = subject_or_default(m.subject.as_deref());
            let date = display_date(&m.created_at);

            text.push_str(&format!(
                "- {date} | {} <{}> | {subject_line} | {status}\n",
                m.name, m.email
            ));
            rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{status}</td></tr>",
                encode_text(&date),
                encode_text(&m.name),
                encode_text(&m.email),
                encode_text(subject_line)
            ));
        }
        format!(
            r"<p><b>{total}</b> total submissions, <b>{unread}</b> unread.</p>
  <table style='width: 100%; border-collapse: collapse;'>
    <thead><tr><th>Date</th><th>Name</th><th>Email</th><th>Subject</th><th>Status</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>"
        )
    };

    RenderedEmail {
        subject,
        text,
        html: wrap(
            &format!("Weekly Contact Form Summary ({week_start} to {week_end})"),
            &inner,
            "Automated weekly summary from the portfolio website.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, subject: Option<&str>, is_read: bool) -> contact_messages::Model {
        contact_messages::Model {
            id: "m1".to_string(),
            name: name.to_string(),
            email: "visitor@example.com".to_string(),
            subject: subject.map(str::to_string),
            message: "Hello\nthere".to_string(),
            is_read,
            created_at: "2026-03-02T10:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_contact_notification_escapes_user_text() {
        let email = contact_notification(&message("<script>x</script>", None, false));

        assert_eq!(email.subject, "New Contact Form Submission: General Inquiry");
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("Hello<br>there"));
        assert!(email.text.contains("Name: <script>x</script>"));
    }

    #[test]
    fn test_weekly_digest_counts() {
        let messages = vec![
            message("Ada", Some("Hiring"), false),
            message("Grace", None, true),
        ];
        let email = weekly_digest(&messages, "2026-02-23", "2026-03-02");

        assert_eq!(
            email.subject,
            "Weekly Contact Form Summary - 2026-02-23 to 2026-03-02"
        );
        assert!(email.text.contains("Total Submissions: 2"));
        assert!(email.text.contains("Unread Messages: 1"));
        assert!(email.text.contains("2026-03-02 | Ada <visitor@example.com> | Hiring | Unread"));
        assert!(email.html.contains("<td>Grace</td>"));
    }

    #[test]
    fn test_weekly_digest_empty_week() {
        let email = weekly_digest(&[], "2026-02-23", "2026-03-02");
        assert!(email.text.contains("No contact form submissions received this week."));
        assert!(email.text.contains("Total Submissions: 0"));
    }

    #[test]
    fn test_password_reset_contains_link() {
        let email = password_reset("https://site.test/reset-password?token=abc&x=1", 60);
        assert!(email.text.contains("https://site.test/reset-password?token=abc&x=1"));
        assert!(email.html.contains("token=abc&amp;x=1"));
        assert!(email.text.contains("60 minutes"));
    }
}
