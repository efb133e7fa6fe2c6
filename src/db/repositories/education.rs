use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{education, prelude::*};
use crate::models::professional::EducationInput;

pub struct EducationRepository {
    conn: DatabaseConnection,
}

impl EducationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_visible(&self) -> Result<Vec<education::Model>> {
        Education::find()
            .filter(education::Column::IsVisible.eq(true))
            .order_by_desc(education::Column::EndDate)
            .order_by_asc(education::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list education")
    }

    pub async fn get(&self, id: &str) -> Result<Option<education::Model>> {
        Education::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query education entry")
    }

    pub async fn get_visible(&self, id: &str) -> Result<Option<education::Model>> {
        Education::find_by_id(id)
            .filter(education::Column::IsVisible.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query education entry")
    }

    pub async fn create(&self, input: EducationInput) -> Result<education::Model> {
        let now = timestamp();
        let mut active = education::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert education entry")
    }

    pub async fn update(&self, id: &str, input: EducationInput) -> Result<Option<education::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: education::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update education entry")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Education::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete education entry")?;
        Ok(result.rows_affected > 0)
    }
}
