use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};

use super::{new_id, timestamp};
use crate::entities::{forum_posts, forum_replies, prelude::*, users};
use crate::models::content::{ForumPostInput, ForumPostView, ForumReplyInput, ForumReplyView};

pub struct ForumPostRepository {
    conn: DatabaseConnection,
}

impl ForumPostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn reply_counts(&self, post_ids: Vec<String>) -> Result<HashMap<String, i64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, i64)> = ForumReplies::find()
            .select_only()
            .column(forum_replies::Column::PostId)
            .column_as(forum_replies::Column::Id.count(), "count")
            .filter(forum_replies::Column::PostId.is_in(post_ids))
            .group_by(forum_replies::Column::PostId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count forum replies")?;

        Ok(rows.into_iter().collect())
    }

    /// Newest first, with author and reply count.
    pub async fn list(&self) -> Result<Vec<ForumPostView>> {
        let rows = ForumPosts::find()
            .find_also_related(Users)
            .order_by_desc(forum_posts::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list forum posts")?;

        let counts = self
            .reply_counts(rows.iter().map(|(p, _)| p.id.clone()).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(post, author)| ForumPostView {
                reply_count: counts.get(&post.id).copied().unwrap_or(0),
                post,
                author: author.map(Into::into),
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<ForumPostView>> {
        let Some((post, author)) = ForumPosts::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query forum post")?
        else {
            return Ok(None);
        };

        let counts = self.reply_counts(vec![post.id.clone()]).await?;
        Ok(Some(ForumPostView {
            reply_count: counts.get(&post.id).copied().unwrap_or(0),
            post,
            author: author.map(Into::into),
        }))
    }

    pub async fn create(&self, input: ForumPostInput, author_id: &str) -> Result<ForumPostView> {
        let now = timestamp();
        let active = forum_posts::ActiveModel {
            id: Set(new_id()),
            title: Set(input.title),
            content: Set(input.content),
            category: Set(input.category),
            author_id: Set(Some(author_id.to_string())),
            is_answered: Set(false),
            views: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let post = active
            .insert(&self.conn)
            .await
            .context("Failed to insert forum post")?;

        self.get(&post.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Forum post {} vanished after insert", post.id))
    }

    pub async fn increment_views(&self, id: &str) -> Result<bool> {
        let result = ForumPosts::update_many()
            .col_expr(
                forum_posts::Column::Views,
                Expr::col(forum_posts::Column::Views).add(1),
            )
            .filter(forum_posts::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to increment forum post views")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn mark_answered(&self, id: &str) -> Result<bool> {
        let result = ForumPosts::update_many()
            .col_expr(forum_posts::Column::IsAnswered, Expr::value(true))
            .col_expr(forum_posts::Column::UpdatedAt, Expr::value(timestamp()))
            .filter(forum_posts::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to mark forum post answered")?;
        Ok(result.rows_affected > 0)
    }
}

fn reply_view((reply, author): (forum_replies::Model, Option<users::Model>)) -> ForumReplyView {
    ForumReplyView {
        reply,
        author: author.map(Into::into),
    }
}

pub struct ForumReplyRepository {
    conn: DatabaseConnection,
}

impl ForumReplyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Oldest first.
    pub async fn list_for_post(&self, post_id: &str) -> Result<Vec<ForumReplyView>> {
        let rows = ForumReplies::find()
            .filter(forum_replies::Column::PostId.eq(post_id))
            .find_also_related(Users)
            .order_by_asc(forum_replies::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list forum replies")?;

        Ok(rows.into_iter().map(reply_view).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<ForumReplyView>> {
        let row = ForumReplies::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query forum reply")?;

        Ok(row.map(reply_view))
    }

    pub async fn create(
        &self,
        post_id: &str,
        author_id: &str,
        input: ForumReplyInput,
    ) -> Result<ForumReplyView> {
        let now = timestamp();
        let active = forum_replies::ActiveModel {
            id: Set(new_id()),
            content: Set(input.content),
            post_id: Set(post_id.to_string()),
            author_id: Set(Some(author_id.to_string())),
            is_accepted: Set(false),
            likes: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let reply = active
            .insert(&self.conn)
            .await
            .context("Failed to insert forum reply")?;

        self.get(&reply.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Forum reply {} vanished after insert", reply.id))
    }

    /// Marks the reply accepted. The caller marks the parent post answered.
    pub async fn accept(&self, id: &str) -> Result<Option<ForumReplyView>> {
        let result = ForumReplies::update_many()
            .col_expr(forum_replies::Column::IsAccepted, Expr::value(true))
            .col_expr(forum_replies::Column::UpdatedAt, Expr::value(timestamp()))
            .filter(forum_replies::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to accept forum reply")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get(id).await
    }
}
