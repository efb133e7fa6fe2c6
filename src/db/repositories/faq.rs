use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{faqs, prelude::*};
use crate::models::content::FaqInput;

pub struct FaqRepository {
    conn: DatabaseConnection,
}

impl FaqRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_visible(&self) -> Result<Vec<faqs::Model>> {
        Faqs::find()
            .filter(faqs::Column::IsVisible.eq(true))
            .order_by_asc(faqs::Column::SortOrder)
            .order_by_asc(faqs::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list FAQs")
    }

    pub async fn get(&self, id: &str) -> Result<Option<faqs::Model>> {
        Faqs::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query FAQ")
    }

    pub async fn create(&self, input: FaqInput) -> Result<faqs::Model> {
        let now = timestamp();
        let mut active = faqs::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert FAQ")
    }

    pub async fn update(&self, id: &str, input: FaqInput) -> Result<Option<faqs::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: faqs::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update FAQ")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Faqs::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete FAQ")?;
        Ok(result.rows_affected > 0)
    }
}
