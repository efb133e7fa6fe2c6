use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{prelude::*, projects};
use crate::models::professional::ProjectInput;

pub struct ProjectRepository {
    conn: DatabaseConnection,
}

impl ProjectRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_visible(&self) -> Result<Vec<projects::Model>> {
        Projects::find()
            .filter(projects::Column::IsVisible.eq(true))
            .order_by_desc(projects::Column::StartDate)
            .order_by_desc(projects::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list projects")
    }

    pub async fn list_featured(&self) -> Result<Vec<projects::Model>> {
        Projects::find()
            .filter(projects::Column::IsVisible.eq(true))
            .filter(projects::Column::IsFeatured.eq(true))
            .order_by_desc(projects::Column::StartDate)
            .order_by_desc(projects::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list featured projects")
    }

    pub async fn get(&self, id: &str) -> Result<Option<projects::Model>> {
        Projects::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query project")
    }

    pub async fn get_visible(&self, id: &str) -> Result<Option<projects::Model>> {
        Projects::find_by_id(id)
            .filter(projects::Column::IsVisible.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query project")
    }

    pub async fn create(&self, input: ProjectInput) -> Result<projects::Model> {
        let now = timestamp();
        let mut active = projects::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert project")
    }

    pub async fn update(&self, id: &str, input: ProjectInput) -> Result<Option<projects::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: projects::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update project")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Projects::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete project")?;
        Ok(result.rows_affected > 0)
    }
}
