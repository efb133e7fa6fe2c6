use std::collections::BTreeMap;

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{prelude::*, social_links};
use crate::models::professional::{SocialLinkInput, group_by_category};

pub struct SocialLinkRepository {
    conn: DatabaseConnection,
}

impl SocialLinkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_visible(&self) -> Result<Vec<social_links::Model>> {
        SocialLinks::find()
            .filter(social_links::Column::IsVisible.eq(true))
            .order_by_asc(social_links::Column::Category)
            .order_by_asc(social_links::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list social links")
    }

    pub async fn list_featured(&self) -> Result<Vec<social_links::Model>> {
        SocialLinks::find()
            .filter(social_links::Column::IsVisible.eq(true))
            .filter(social_links::Column::IsFeatured.eq(true))
            .order_by_asc(social_links::Column::Category)
            .order_by_asc(social_links::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list featured social links")
    }

    pub async fn grouped_by_category(&self) -> Result<BTreeMap<String, Vec<social_links::Model>>> {
        let rows = self.list_visible().await?;
        Ok(group_by_category(rows, |l| l.category.as_str()))
    }

    pub async fn get(&self, id: &str) -> Result<Option<social_links::Model>> {
        SocialLinks::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query social link")
    }

    pub async fn get_visible(&self, id: &str) -> Result<Option<social_links::Model>> {
        SocialLinks::find_by_id(id)
            .filter(social_links::Column::IsVisible.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query social link")
    }

    pub async fn create(&self, input: SocialLinkInput) -> Result<social_links::Model> {
        let now = timestamp();
        let mut active = social_links::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert social link")
    }

    pub async fn update(&self, id: &str, input: SocialLinkInput) -> Result<Option<social_links::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: social_links::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update social link")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = SocialLinks::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete social link")?;
        Ok(result.rows_affected > 0)
    }
}
