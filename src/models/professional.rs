//! Request bodies for the professional-profile resources.
//!
//! Every input replaces all writable columns of its row, so `apply_to` is
//! shared between create and full update.

use std::collections::BTreeMap;

use sea_orm::Set;
use serde::Deserialize;

use super::{default_true, json_list};
use crate::entities::{
    achievements, certifications, education, employment_experience, projects, skills,
    social_links,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentInput {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub domain: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

impl EmploymentInput {
    pub fn apply_to(self, model: &mut employment_experience::ActiveModel) {
        model.company = Set(self.company);
        model.position = Set(self.position);
        model.location = Set(self.location);
        model.start_date = Set(self.start_date);
        model.end_date = Set(self.end_date);
        model.is_current = Set(self.is_current);
        model.description = Set(self.description);
        model.achievements = Set(json_list(self.achievements));
        model.technologies = Set(json_list(self.technologies));
        model.responsibilities = Set(json_list(self.responsibilities));
        model.domain = Set(self.domain);
        model.sort_order = Set(self.sort_order);
        model.is_visible = Set(self.is_visible);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub description: Option<String>,
    pub company: Option<String>,
    pub client: Option<String>,
    pub domain: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub methodology: Option<String>,
    pub team_size: Option<String>,
    pub duration: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub outcomes: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl ProjectInput {
    pub fn apply_to(self, model: &mut projects::ActiveModel) {
        model.title = Set(self.title);
        model.description = Set(self.description);
        model.company = Set(self.company);
        model.client = Set(self.client);
        model.domain = Set(self.domain);
        model.technologies = Set(json_list(self.technologies));
        model.methodology = Set(self.methodology);
        model.team_size = Set(self.team_size);
        model.duration = Set(self.duration);
        model.role = Set(self.role);
        model.achievements = Set(json_list(self.achievements));
        model.challenges = Set(json_list(self.challenges));
        model.outcomes = Set(json_list(self.outcomes));
        model.start_date = Set(self.start_date);
        model.end_date = Set(self.end_date);
        model.is_visible = Set(self.is_visible);
        model.is_featured = Set(self.is_featured);
        model.sort_order = Set(self.sort_order);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationInput {
    pub name: String,
    pub provider: String,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub badge_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl CertificationInput {
    pub fn apply_to(self, model: &mut certifications::ActiveModel) {
        model.name = Set(self.name);
        model.provider = Set(self.provider);
        model.credential_id = Set(self.credential_id);
        model.credential_url = Set(self.credential_url);
        model.issue_date = Set(self.issue_date);
        model.expiry_date = Set(self.expiry_date);
        model.description = Set(self.description);
        model.skills = Set(json_list(self.skills));
        model.badge_url = Set(self.badge_url);
        model.is_visible = Set(self.is_visible);
        model.is_featured = Set(self.is_featured);
        model.sort_order = Set(self.sort_order);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    pub name: String,
    pub category: String,
    pub proficiency_level: i32,
    pub years_of_experience: Option<i32>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl SkillInput {
    pub fn apply_to(self, model: &mut skills::ActiveModel) {
        model.name = Set(self.name);
        model.category = Set(self.category);
        model.proficiency_level = Set(self.proficiency_level);
        model.years_of_experience = Set(self.years_of_experience);
        model.description = Set(self.description);
        model.is_visible = Set(self.is_visible);
        model.is_featured = Set(self.is_featured);
        model.sort_order = Set(self.sort_order);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementInput {
    pub title: String,
    pub description: Option<String>,
    pub organization: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub impact: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl AchievementInput {
    pub fn apply_to(self, model: &mut achievements::ActiveModel) {
        model.title = Set(self.title);
        model.description = Set(self.description);
        model.organization = Set(self.organization);
        model.year = Set(self.year);
        model.category = Set(self.category);
        model.impact = Set(self.impact);
        model.is_visible = Set(self.is_visible);
        model.is_featured = Set(self.is_featured);
        model.sort_order = Set(self.sort_order);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub grade: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl EducationInput {
    pub fn apply_to(self, model: &mut education::ActiveModel) {
        model.institution = Set(self.institution);
        model.degree = Set(self.degree);
        model.field = Set(self.field);
        model.location = Set(self.location);
        model.start_date = Set(self.start_date);
        model.end_date = Set(self.end_date);
        model.grade = Set(self.grade);
        model.description = Set(self.description);
        model.achievements = Set(json_list(self.achievements));
        model.is_visible = Set(self.is_visible);
        model.sort_order = Set(self.sort_order);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkInput {
    pub platform: String,
    pub url: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl SocialLinkInput {
    pub fn apply_to(self, model: &mut social_links::ActiveModel) {
        model.platform = Set(self.platform);
        model.url = Set(self.url);
        model.username = Set(self.username);
        model.display_name = Set(self.display_name);
        model.category = Set(self.category);
        model.description = Set(self.description);
        model.icon = Set(self.icon);
        model.is_visible = Set(self.is_visible);
        model.is_featured = Set(self.is_featured);
        model.sort_order = Set(self.sort_order);
    }
}

/// Buckets rows by their `category` column, keeping row order inside each bucket.
pub fn group_by_category<T>(
    rows: Vec<T>,
    category: impl Fn(&T) -> &str,
) -> BTreeMap<String, Vec<T>> {
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for row in rows {
        groups.entry(category(&row).to_string()).or_default().push(row);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_category_keeps_row_order() {
        let rows = vec![("Tools", 1), ("Technical", 2), ("Tools", 3)];
        let groups = group_by_category(rows, |r| r.0);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Tools"], vec![("Tools", 1), ("Tools", 3)]);
        assert_eq!(groups["Technical"], vec![("Technical", 2)]);
    }

    #[test]
    fn test_skill_input_defaults() {
        let input: SkillInput = serde_json::from_str(
            r#"{"name":"Rust","category":"Technical","proficiencyLevel":4}"#,
        )
        .unwrap();
        assert!(input.is_visible);
        assert!(!input.is_featured);
        assert_eq!(input.sort_order, 0);
    }
}
