use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{new_id, timestamp};
use crate::entities::{certifications, prelude::*};
use crate::models::professional::CertificationInput;

pub struct CertificationRepository {
    conn: DatabaseConnection,
}

impl CertificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_visible(&self) -> Result<Vec<certifications::Model>> {
        Certifications::find()
            .filter(certifications::Column::IsVisible.eq(true))
            .order_by_desc(certifications::Column::IssueDate)
            .order_by_desc(certifications::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list certifications")
    }

    pub async fn list_featured(&self) -> Result<Vec<certifications::Model>> {
        Certifications::find()
            .filter(certifications::Column::IsVisible.eq(true))
            .filter(certifications::Column::IsFeatured.eq(true))
            .order_by_desc(certifications::Column::IssueDate)
            .order_by_desc(certifications::Column::SortOrder)
            .all(&self.conn)
            .await
            .context("Failed to list featured certifications")
    }

    pub async fn get(&self, id: &str) -> Result<Option<certifications::Model>> {
        Certifications::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query certification")
    }

    pub async fn get_visible(&self, id: &str) -> Result<Option<certifications::Model>> {
        Certifications::find_by_id(id)
            .filter(certifications::Column::IsVisible.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query certification")
    }

    pub async fn create(&self, input: CertificationInput) -> Result<certifications::Model> {
        let now = timestamp();
        let mut active = certifications::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert certification")
    }

    pub async fn update(&self, id: &str, input: CertificationInput) -> Result<Option<certifications::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: certifications::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update certification")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Certifications::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete certification")?;
        Ok(result.rows_affected > 0)
    }
}
