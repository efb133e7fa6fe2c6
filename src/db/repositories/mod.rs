pub mod achievement;
pub mod blog;
pub mod certification;
pub mod comment;
pub mod contact;
pub mod contest;
pub mod education;
pub mod employment;
pub mod faq;
pub mod forum;
pub mod portfolio;
pub mod project;
pub mod skill;
pub mod social_link;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 in UTC so stored timestamps compare correctly as text.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[must_use]
pub fn timestamp() -> String {
    format_timestamp(Utc::now())
}

#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_order_lexically() {
        let a = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(500);
        let c = a + chrono::Duration::days(1);

        assert_eq!(format_timestamp(a), "2026-03-01T09:00:00.000Z");
        assert!(format_timestamp(a) < format_timestamp(b));
        assert!(format_timestamp(b) < format_timestamp(c));
    }
}
