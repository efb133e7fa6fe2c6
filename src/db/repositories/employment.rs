use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{employment_experience, prelude::*};
use crate::models::professional::EmploymentInput;

pub struct EmploymentRepository {
    conn: DatabaseConnection,
}

impl EmploymentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Most recent role first.
    pub async fn list_visible(&self) -> Result<Vec<employment_experience::Model>> {
        EmploymentExperience::find()
            .filter(employment_experience::Column::IsVisible.eq(true))
            .order_by_desc(employment_experience::Column::StartDate)
            .order_by_desc(employment_experience::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list employment history")
    }

    pub async fn get(&self, id: &str) -> Result<Option<employment_experience::Model>> {
        EmploymentExperience::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query employment entry")
    }

    pub async fn get_visible(&self, id: &str) -> Result<Option<employment_experience::Model>> {
        EmploymentExperience::find_by_id(id)
            .filter(employment_experience::Column::IsVisible.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query employment entry")
    }

    pub async fn create(&self, input: EmploymentInput) -> Result<employment_experience::Model> {
        let now = timestamp();
        let mut active = employment_experience::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert employment entry")
    }

    pub async fn update(&self, id: &str, input: EmploymentInput) -> Result<Option<employment_experience::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: employment_experience::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update employment entry")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = EmploymentExperience::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete employment entry")?;
        Ok(result.rows_affected > 0)
    }
}
