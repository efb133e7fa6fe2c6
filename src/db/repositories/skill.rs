use std::collections::BTreeMap;

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{prelude::*, skills};
use crate::models::professional::{SkillInput, group_by_category};

pub struct SkillRepository {
    conn: DatabaseConnection,
}

impl SkillRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Strongest first.
    pub async fn list_visible(&self) -> Result<Vec<skills::Model>> {
        Skills::find()
            .filter(skills::Column::IsVisible.eq(true))
            .order_by_desc(skills::Column::ProficiencyLevel)
            .order_by_asc(skills::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list skills")
    }

    pub async fn list_featured(&self) -> Result<Vec<skills::Model>> {
        Skills::find()
            .filter(skills::Column::IsVisible.eq(true))
            .filter(skills::Column::IsFeatured.eq(true))
            .order_by_desc(skills::Column::ProficiencyLevel)
            .order_by_asc(skills::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list featured skills")
    }

    pub async fn grouped_by_category(&self) -> Result<BTreeMap<String, Vec<skills::Model>>> {
        let rows = self.list_visible().await?;
        Ok(group_by_category(rows, |s| s.category.as_str()))
    }

    pub async fn get(&self, id: &str) -> Result<Option<skills::Model>> {
        Skills::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query skill")
    }

    /// Like `get`, but hidden rows are treated as missing.
    pub async fn get_visible(&self, id: &str) -> Result<Option<skills::Model>> {
        Skills::find_by_id(id)
            .filter(skills::Column::IsVisible.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query skill")
    }

    pub async fn create(&self, input: SkillInput) -> Result<skills::Model> {
        let now = timestamp();
        let mut active = skills::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert skill")
    }

    pub async fn update(&self, id: &str, input: SkillInput) -> Result<Option<skills::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: skills::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update skill")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Skills::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete skill")?;
        Ok(result.rows_affected > 0)
    }
}
