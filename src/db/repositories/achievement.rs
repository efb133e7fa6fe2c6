use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{achievements, prelude::*};
use crate::models::professional::AchievementInput;

pub struct AchievementRepository {
    conn: DatabaseConnection,
}

impl AchievementRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_visible(&self) -> Result<Vec<achievements::Model>> {
        Achievements::find()
            .filter(achievements::Column::IsVisible.eq(true))
            .order_by_desc(achievements::Column::Year)
            .order_by_asc(achievements::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list achievements")
    }

    pub async fn list_featured(&self) -> Result<Vec<achievements::Model>> {
        Achievements::find()
            .filter(achievements::Column::IsVisible.eq(true))
            .filter(achievements::Column::IsFeatured.eq(true))
            .order_by_desc(achievements::Column::Year)
            .order_by_asc(achievements::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list featured achievements")
    }

    pub async fn get(&self, id: &str) -> Result<Option<achievements::Model>> {
        Achievements::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query achievement")
    }

    pub async fn get_visible(&self, id: &str) -> Result<Option<achievements::Model>> {
        Achievements::find_by_id(id)
            .filter(achievements::Column::IsVisible.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query achievement")
    }

    pub async fn create(&self, input: AchievementInput) -> Result<achievements::Model> {
        let now = timestamp();
        let mut active = achievements::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert achievement")
    }

    pub async fn update(&self, id: &str, input: AchievementInput) -> Result<Option<achievements::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: achievements::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update achievement")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Achievements::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete achievement")?;
        Ok(result.rows_affected > 0)
    }
}
