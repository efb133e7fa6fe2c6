use serde::Serialize;

use crate::entities::users;

/// User as exposed over the API. Never carries the password hash or reset token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_admin: bool,
    pub is_email_verified: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            profile_image_url: model.profile_image_url,
            is_admin: model.is_admin,
            is_email_verified: model.is_email_verified,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Public byline attached to posts, comments and replies.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl From<users::Model> for Author {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            profile_image_url: model.profile_image_url,
        }
    }
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone().unwrap_or_else(|| self.id.clone()),
        }
    }
}

/// Profile returned by the hosted identity provider, used to upsert a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostedProfile {
    pub subject: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> User {
        User {
            id: "u1".to_string(),
            email: email.map(str::to_string),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            profile_image_url: None,
            is_admin: false,
            is_email_verified: false,
            last_login_at: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(user(Some("Ada"), Some("Lovelace"), None).display_name(), "Ada Lovelace");
        assert_eq!(user(Some("Ada"), None, None).display_name(), "Ada");
        assert_eq!(user(None, None, Some("ada@example.com")).display_name(), "ada@example.com");
        assert_eq!(user(None, None, None).display_name(), "u1");
    }

    #[test]
    fn test_user_serializes_without_secrets() {
        let json = serde_json::to_value(user(Some("Ada"), None, None)).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("resetPasswordToken").is_none());
    }
}
