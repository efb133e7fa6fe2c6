use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use super::{new_id, timestamp};
use crate::entities::{comments, prelude::*, users};
use crate::models::content::{CommentInput, CommentView};

fn comment_view((comment, author): (comments::Model, Option<users::Model>)) -> CommentView {
    CommentView {
        comment,
        author: author.map(Into::into),
    }
}

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Oldest first.
    pub async fn list_for_post(&self, post_id: &str) -> Result<Vec<CommentView>> {
        let rows = Comments::find()
            .filter(comments::Column::PostId.eq(post_id))
            .find_also_related(Users)
            .order_by_asc(comments::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list comments")?;

        Ok(rows.into_iter().map(comment_view).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<CommentView>> {
        let row = Comments::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query comment")?;

        Ok(row.map(comment_view))
    }

    pub async fn create(
        &self,
        post_id: &str,
        author_id: &str,
        input: CommentInput,
    ) -> Result<CommentView> {
        let now = timestamp();
        let active = comments::ActiveModel {
            id: Set(new_id()),
            content: Set(input.content),
            author_id: Set(Some(author_id.to_string())),
            post_id: Set(post_id.to_string()),
            parent_id: Set(input.parent_id),
            likes: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let comment = active
            .insert(&self.conn)
            .await
            .context("Failed to insert comment")?;

        self.get(&comment.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Comment {} vanished after insert", comment.id))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Comments::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete comment")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn increment_likes(&self, id: &str) -> Result<Option<i32>> {
        let result = Comments::update_many()
            .col_expr(
                comments::Column::Likes,
                Expr::col(comments::Column::Likes).add(1),
            )
            .filter(comments::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to increment comment likes")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let comment = Comments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query comment")?;
        Ok(comment.map(|c| c.likes))
    }
}
