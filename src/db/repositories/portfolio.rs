use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use super::{new_id, timestamp};
use crate::entities::{portfolio_sections, prelude::*};
use crate::models::content::PortfolioSectionInput;

pub struct PortfolioRepository {
    conn: DatabaseConnection,
}

impl PortfolioRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<portfolio_sections::Model>> {
        PortfolioSections::find()
            .order_by_asc(portfolio_sections::Column::SortOrder)
            .order_by_asc(portfolio_sections::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list portfolio sections")
    }

    pub async fn get(&self, id: &str) -> Result<Option<portfolio_sections::Model>> {
        PortfolioSections::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query portfolio section")
    }

    pub async fn create(&self, input: PortfolioSectionInput) -> Result<portfolio_sections::Model> {
        let now = timestamp();
        let mut active = portfolio_sections::ActiveModel {
            id: Set(new_id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert portfolio section")
    }

    pub async fn update(
        &self,
        id: &str,
        input: PortfolioSectionInput,
    ) -> Result<Option<portfolio_sections::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: portfolio_sections::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update portfolio section")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = PortfolioSections::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete portfolio section")?;
        Ok(result.rows_affected > 0)
    }

    /// Flips `is_visible` in place and returns the updated row.
    pub async fn toggle_visibility(&self, id: &str) -> Result<Option<portfolio_sections::Model>> {
        let result = PortfolioSections::update_many()
            .col_expr(
                portfolio_sections::Column::IsVisible,
                Expr::col(portfolio_sections::Column::IsVisible).not(),
            )
            .col_expr(portfolio_sections::Column::UpdatedAt, Expr::value(timestamp()))
            .filter(portfolio_sections::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to toggle portfolio section visibility")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get(id).await
    }
}
