use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

use super::ApiError;
use crate::models::content::{
    BlogPostInput, CommentInput, ContactMessageInput, ContestInput, FaqInput, ForumPostInput,
    ForumReplyInput, PortfolioSectionInput,
};
use crate::models::professional::{
    AchievementInput, CertificationInput, EducationInput, EmploymentInput, ProjectInput,
    SkillInput, SocialLinkInput,
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate_required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    let valid = trimmed.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && domain.contains('.')
            && !trimmed.chars().any(char::is_whitespace)
            && !domain.contains('@')
    });

    if !valid {
        return Err(ApiError::validation("Invalid email address"));
    }
    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(password)
}

fn slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid slug regex"))
}

/// Lowercase letters, digits and single hyphens between them.
pub fn validate_slug(slug: &str) -> Result<&str, ApiError> {
    if !slug_regex().is_match(slug) {
        return Err(ApiError::validation(
            "Slug may only contain lowercase letters, numbers and hyphens",
        ));
    }
    Ok(slug)
}

pub fn validate_date(field: &str, value: &str) -> Result<(), ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ApiError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

fn validate_optional_date(field: &str, value: Option<&String>) -> Result<(), ApiError> {
    value.map_or(Ok(()), |v| validate_date(field, v))
}

pub fn validate_timestamp(field: &str, value: &str) -> Result<(), ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|_| ApiError::validation(format!("{field} must be an RFC 3339 timestamp")))
}

pub fn validate_url(field: &str, value: &str) -> Result<(), ApiError> {
    match url::Url::parse(value) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
        _ => Err(ApiError::validation(format!("{field} must be an http(s) URL"))),
    }
}

fn validate_optional_url(field: &str, value: Option<&String>) -> Result<(), ApiError> {
    value.map_or(Ok(()), |v| validate_url(field, v))
}

pub fn validate_proficiency(level: i32) -> Result<i32, ApiError> {
    if !(1..=5).contains(&level) {
        return Err(ApiError::validation(format!(
            "Invalid proficiency level: {level}. Must be between 1 and 5"
        )));
    }
    Ok(level)
}

fn validate_non_negative(field: &str, value: Option<i32>) -> Result<(), ApiError> {
    match value {
        Some(v) if v < 0 => Err(ApiError::validation(format!("{field} cannot be negative"))),
        _ => Ok(()),
    }
}

// ============================================================================
// Request bodies
// ============================================================================

pub fn validate_section(input: &PortfolioSectionInput) -> Result<(), ApiError> {
    validate_required("Title", &input.title)?;
    validate_required("Type", &input.section_type)?;
    Ok(())
}

pub fn validate_blog_post(input: &BlogPostInput) -> Result<(), ApiError> {
    validate_required("Title", &input.title)?;
    validate_required("Content", &input.content)?;
    validate_slug(&input.slug)?;
    validate_non_negative("Read time", input.read_time)?;
    validate_optional_url("Featured image", input.featured_image.as_ref())?;
    Ok(())
}

pub fn validate_comment(input: &CommentInput) -> Result<(), ApiError> {
    validate_required("Content", &input.content)?;
    Ok(())
}

pub fn validate_forum_post(input: &ForumPostInput) -> Result<(), ApiError> {
    validate_required("Title", &input.title)?;
    validate_required("Content", &input.content)?;
    Ok(())
}

pub fn validate_forum_reply(input: &ForumReplyInput) -> Result<(), ApiError> {
    validate_required("Content", &input.content)?;
    Ok(())
}

pub fn validate_contest(input: &ContestInput) -> Result<(), ApiError> {
    validate_required("Title", &input.title)?;
    if let Some(deadline) = &input.deadline {
        validate_timestamp("Deadline", deadline)?;
    }
    Ok(())
}

pub fn validate_faq(input: &FaqInput) -> Result<(), ApiError> {
    validate_required("Question", &input.question)?;
    validate_required("Answer", &input.answer)?;
    Ok(())
}

pub fn validate_contact(input: &ContactMessageInput) -> Result<(), ApiError> {
    validate_required("Name", &input.name)?;
    validate_email(&input.email)?;
    validate_required("Message", &input.message)?;
    Ok(())
}

pub fn validate_employment(input: &EmploymentInput) -> Result<(), ApiError> {
    validate_required("Company", &input.company)?;
    validate_required("Position", &input.position)?;
    validate_date("Start date", &input.start_date)?;
    validate_optional_date("End date", input.end_date.as_ref())?;
    Ok(())
}

pub fn validate_project(input: &ProjectInput) -> Result<(), ApiError> {
    validate_required("Title", &input.title)?;
    validate_optional_date("Start date", input.start_date.as_ref())?;
    validate_optional_date("End date", input.end_date.as_ref())?;
    Ok(())
}

pub fn validate_certification(input: &CertificationInput) -> Result<(), ApiError> {
    validate_required("Name", &input.name)?;
    validate_required("Provider", &input.provider)?;
    validate_optional_date("Issue date", input.issue_date.as_ref())?;
    validate_optional_date("Expiry date", input.expiry_date.as_ref())?;
    validate_optional_url("Credential URL", input.credential_url.as_ref())?;
    validate_optional_url("Badge URL", input.badge_url.as_ref())?;
    Ok(())
}

pub fn validate_skill(input: &SkillInput) -> Result<(), ApiError> {
    validate_required("Name", &input.name)?;
    validate_required("Category", &input.category)?;
    validate_proficiency(input.proficiency_level)?;
    validate_non_negative("Years of experience", input.years_of_experience)?;
    Ok(())
}

pub fn validate_achievement(input: &AchievementInput) -> Result<(), ApiError> {
    validate_required("Title", &input.title)?;
    Ok(())
}

pub fn validate_education(input: &EducationInput) -> Result<(), ApiError> {
    validate_required("Institution", &input.institution)?;
    validate_required("Degree", &input.degree)?;
    validate_optional_date("Start date", input.start_date.as_ref())?;
    validate_optional_date("End date", input.end_date.as_ref())?;
    Ok(())
}

pub fn validate_social_link(input: &SocialLinkInput) -> Result<(), ApiError> {
    validate_required("Platform", &input.platform)?;
    validate_required("Category", &input.category)?;
    validate_url("URL", &input.url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("  ada@example.com ").is_ok());
        assert!(validate_email("ada").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("ada@@example.com").is_err());
        assert!(validate_email("a da@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hello-world").is_ok());
        assert!(validate_slug("post-2").is_ok());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("Start date", "2024-02-29").is_ok());
        assert!(validate_date("Start date", "2023-02-29").is_err());
        assert!(validate_date("Start date", "02/01/2024").is_err());
    }

    #[test]
    fn test_validate_timestamp() {
        assert!(validate_timestamp("Deadline", "2026-05-01T12:00:00Z").is_ok());
        assert!(validate_timestamp("Deadline", "2026-05-01").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("URL", "https://github.com/ada").is_ok());
        assert!(validate_url("URL", "ftp://example.com").is_err());
        assert!(validate_url("URL", "not a url").is_err());
    }

    #[test]
    fn test_validate_proficiency() {
        assert!(validate_proficiency(1).is_ok());
        assert!(validate_proficiency(5).is_ok());
        assert!(validate_proficiency(0).is_err());
        assert!(validate_proficiency(6).is_err());
    }

    #[test]
    fn test_validate_required_message() {
        let err = validate_required("Title", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Title is required");
    }
}
