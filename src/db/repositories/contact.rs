use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use super::{new_id, timestamp};
use crate::entities::{contact_messages, prelude::*};
use crate::models::content::ContactMessageInput;

pub struct ContactRepository {
    conn: DatabaseConnection,
}

impl ContactRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, input: ContactMessageInput) -> Result<contact_messages::Model> {
        let mut active = contact_messages::ActiveModel {
            id: Set(new_id()),
            is_read: Set(false),
            created_at: Set(timestamp()),
            ..Default::default()
        };
        input.apply_to(&mut active);

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert contact message")
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<contact_messages::Model>> {
        ContactMessages::find()
            .order_by_desc(contact_messages::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list contact messages")
    }

    /// Messages with `start <= created_at < end`, newest first.
    pub async fn list_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<contact_messages::Model>> {
        ContactMessages::find()
            .filter(contact_messages::Column::CreatedAt.gte(start))
            .filter(contact_messages::Column::CreatedAt.lt(end))
            .order_by_desc(contact_messages::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list contact messages in range")
    }

    pub async fn mark_read(&self, id: &str) -> Result<Option<contact_messages::Model>> {
        let result = ContactMessages::update_many()
            .col_expr(contact_messages::Column::IsRead, Expr::value(true))
            .filter(contact_messages::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to mark contact message read")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        ContactMessages::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query contact message")
    }
}
