//! Career profile resources: employment, projects, certifications, skills,
//! achievements, education and social links.
//!
//! Reads are public and only return visible rows. Writes are admin-only and
//! share one shape per resource, generated by `resource_handlers!`.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::validation;
use super::{
    ApiError, ApiJson, ApiQuery, ApiResponse, AppState, ListQuery, MessageResponse,
};
use crate::entities::{
    achievements, certifications, education, employment_experience, projects, skills,
    social_links,
};
use crate::models::professional::{
    AchievementInput, CertificationInput, EducationInput, EmploymentInput, ProjectInput,
    SkillInput, SocialLinkInput,
};

/// Either a flat list or rows bucketed by category (`?byCategory=true`).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Rows(Vec<T>),
    Grouped(BTreeMap<String, Vec<T>>),
}

macro_rules! resource_handlers {
    ($module:ident, $repo:ident, $model:ty, $input:ty, $validate:path, $label:literal) => {
        pub mod $module {
            use super::*;

            pub async fn get(
                State(state): State<Arc<AppState>>,
                Path(id): Path<String>,
            ) -> Result<Json<ApiResponse<$model>>, ApiError> {
                let row = state
                    .store
                    .$repo()
                    .get_visible(&id)
                    .await?
                    .ok_or_else(|| ApiError::not_found($label, &id))?;
                Ok(Json(ApiResponse::success(row)))
            }

            pub async fn create(
                State(state): State<Arc<AppState>>,
                ApiJson(input): ApiJson<$input>,
            ) -> Result<Json<ApiResponse<$model>>, ApiError> {
                $validate(&input)?;
                let row = state.store.$repo().create(input).await?;
                Ok(Json(ApiResponse::success(row)))
            }

            pub async fn update(
                State(state): State<Arc<AppState>>,
                Path(id): Path<String>,
                ApiJson(input): ApiJson<$input>,
            ) -> Result<Json<ApiResponse<$model>>, ApiError> {
                $validate(&input)?;
                let row = state
                    .store
                    .$repo()
                    .update(&id, input)
                    .await?
                    .ok_or_else(|| ApiError::not_found($label, &id))?;
                Ok(Json(ApiResponse::success(row)))
            }

            pub async fn delete(
                State(state): State<Arc<AppState>>,
                Path(id): Path<String>,
            ) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
                if !state.store.$repo().delete(&id).await? {
                    return Err(ApiError::not_found($label, &id));
                }
                Ok(Json(ApiResponse::success(MessageResponse::new(concat!(
                    $label, " deleted"
                )))))
            }
        }
    };
}

resource_handlers!(
    employment,
    employment,
    employment_experience::Model,
    EmploymentInput,
    validation::validate_employment,
    "Employment experience"
);
resource_handlers!(
    project,
    projects,
    projects::Model,
    ProjectInput,
    validation::validate_project,
    "Project"
);
resource_handlers!(
    certification,
    certifications,
    certifications::Model,
    CertificationInput,
    validation::validate_certification,
    "Certification"
);
resource_handlers!(
    skill,
    skills,
    skills::Model,
    SkillInput,
    validation::validate_skill,
    "Skill"
);
resource_handlers!(
    achievement,
    achievements,
    achievements::Model,
    AchievementInput,
    validation::validate_achievement,
    "Achievement"
);
resource_handlers!(
    education_entry,
    education,
    education::Model,
    EducationInput,
    validation::validate_education,
    "Education"
);
resource_handlers!(
    social_link,
    social_links,
    social_links::Model,
    SocialLinkInput,
    validation::validate_social_link,
    "Social link"
);

// ============================================================================
// Listings
// ============================================================================

/// GET /employment-experience
pub async fn list_employment(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<employment_experience::Model>>>, ApiError> {
    let rows = state.store.employment().list_visible().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /projects?featured=true
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<projects::Model>>>, ApiError> {
    let repo = state.store.projects();
    let rows = if query.featured {
        repo.list_featured().await?
    } else {
        repo.list_visible().await?
    };
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /certifications?featured=true
pub async fn list_certifications(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<certifications::Model>>>, ApiError> {
    let repo = state.store.certifications();
    let rows = if query.featured {
        repo.list_featured().await?
    } else {
        repo.list_visible().await?
    };
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /skills?featured=true | ?byCategory=true
/// `byCategory` takes precedence and groups every visible skill.
pub async fn list_skills(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Listing<skills::Model>>>, ApiError> {
    let repo = state.store.skills();
    let listing = if query.by_category {
        Listing::Grouped(repo.grouped_by_category().await?)
    } else if query.featured {
        Listing::Rows(repo.list_featured().await?)
    } else {
        Listing::Rows(repo.list_visible().await?)
    };
    Ok(Json(ApiResponse::success(listing)))
}

/// GET /achievements?featured=true
pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<achievements::Model>>>, ApiError> {
    let repo = state.store.achievements();
    let rows = if query.featured {
        repo.list_featured().await?
    } else {
        repo.list_visible().await?
    };
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /education
pub async fn list_education(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<education::Model>>>, ApiError> {
    let rows = state.store.education().list_visible().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /social-links?featured=true | ?byCategory=true
pub async fn list_social_links(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Listing<social_links::Model>>>, ApiError> {
    let repo = state.store.social_links();
    let listing = if query.by_category {
        Listing::Grouped(repo.grouped_by_category().await?)
    } else if query.featured {
        Listing::Rows(repo.list_featured().await?)
    } else {
        Listing::Rows(repo.list_visible().await?)
    };
    Ok(Json(ApiResponse::success(listing)))
}
