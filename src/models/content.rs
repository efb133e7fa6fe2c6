use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::user::Author;
use super::{default_true, json_list};
use crate::entities::{
    blog_posts, comments, contact_messages, contests, faqs, forum_posts, forum_replies,
    portfolio_sections,
};

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSectionInput {
    pub title: String,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub sort_order: i32,
    pub metadata: Option<serde_json::Value>,
}

impl PortfolioSectionInput {
    pub fn apply_to(self, model: &mut portfolio_sections::ActiveModel) {
        model.title = Set(self.title);
        model.content = Set(self.content);
        model.section_type = Set(self.section_type);
        model.is_visible = Set(self.is_visible);
        model.sort_order = Set(self.sort_order);
        model.metadata = Set(self.metadata);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    pub read_time: Option<i32>,
}

impl BlogPostInput {
    pub fn apply_to(self, model: &mut blog_posts::ActiveModel) {
        model.title = Set(self.title);
        model.slug = Set(self.slug);
        model.content = Set(self.content);
        model.excerpt = Set(self.excerpt);
        model.featured_image = Set(self.featured_image);
        model.category = Set(self.category);
        model.tags = Set(json_list(self.tags));
        model.is_published = Set(self.is_published);
        model.read_time = Set(self.read_time);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub content: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPostInput {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumReplyInput {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestInput {
    pub title: String,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub prize: Option<String>,
    pub deadline: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ContestInput {
    pub fn apply_to(self, model: &mut contests::ActiveModel) {
        model.title = Set(self.title);
        model.description = Set(self.description);
        model.rules = Set(self.rules);
        model.prize = Set(self.prize);
        model.deadline = Set(self.deadline);
        model.is_active = Set(self.is_active);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl FaqInput {
    pub fn apply_to(self, model: &mut faqs::ActiveModel) {
        model.question = Set(self.question);
        model.answer = Set(self.answer);
        model.category = Set(self.category);
        model.is_visible = Set(self.is_visible);
        model.sort_order = Set(self.sort_order);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageInput {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessageInput {
    pub fn apply_to(self, model: &mut contact_messages::ActiveModel) {
        model.name = Set(self.name);
        model.email = Set(self.email);
        model.subject = Set(self.subject);
        model.message = Set(self.message);
    }
}

// ============================================================================
// Response views
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostView {
    #[serde(flatten)]
    pub post: blog_posts::Model,
    pub author: Option<Author>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: comments::Model,
    pub author: Option<Author>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPostView {
    #[serde(flatten)]
    pub post: forum_posts::Model,
    pub author: Option<Author>,
    pub reply_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumReplyView {
    #[serde(flatten)]
    pub reply: forum_replies::Model,
    pub author: Option<Author>,
}

/// Like counter after an increment.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeCount {
    pub likes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_post_input_defaults() {
        let input: BlogPostInput = serde_json::from_str(
            r#"{"title":"Hello","slug":"hello","content":"Body"}"#,
        )
        .unwrap();
        assert!(input.tags.is_empty());
        assert!(!input.is_published);
        assert!(input.read_time.is_none());
    }

    #[test]
    fn test_portfolio_section_input_reads_type_field() {
        let input: PortfolioSectionInput =
            serde_json::from_str(r#"{"title":"About","type":"about","sortOrder":3}"#).unwrap();
        assert_eq!(input.section_type, "about");
        assert_eq!(input.sort_order, 3);
        assert!(input.is_visible);
    }

    #[test]
    fn test_contest_input_defaults_to_active() {
        let input: ContestInput = serde_json::from_str(r#"{"title":"Spring"}"#).unwrap();
        assert!(input.is_active);
    }
}
