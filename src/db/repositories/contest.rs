use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::{new_id, timestamp};
use crate::entities::{contests, prelude::*};
use crate::models::content::ContestInput;

pub struct ContestRepository {
    conn: DatabaseConnection,
}

impl ContestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<contests::Model>> {
        Contests::find()
            .order_by_desc(contests::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list contests")
    }

    pub async fn get(&self, id: &str) -> Result<Option<contests::Model>> {
        Contests::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query contest")
    }

    pub async fn create(&self, input: ContestInput) -> Result<contests::Model> {
        let now = timestamp();
        let mut active = contests::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert contest")
    }

    pub async fn update(&self, id: &str, input: ContestInput) -> Result<Option<contests::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: contests::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update contest")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Contests::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete contest")?;
        Ok(result.rows_affected > 0)
    }
}
