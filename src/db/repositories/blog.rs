use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};

use super::{new_id, timestamp};
use crate::entities::{blog_posts, prelude::*, users};
use crate::models::content::{BlogPostInput, BlogPostView};

fn post_view((post, author): (blog_posts::Model, Option<users::Model>)) -> BlogPostView {
    BlogPostView {
        post,
        author: author.map(Into::into),
    }
}

pub struct BlogRepository {
    conn: DatabaseConnection,
}

impl BlogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Newest first. `published` filters on the publish flag when set.
    pub async fn list(&self, published: Option<bool>) -> Result<Vec<BlogPostView>> {
        let mut query = BlogPosts::find().find_also_related(Users);
        if let Some(published) = published {
            query = query.filter(blog_posts::Column::IsPublished.eq(published));
        }

        let rows = query
            .order_by_desc(blog_posts::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list blog posts")?;

        Ok(rows.into_iter().map(post_view).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<BlogPostView>> {
        let row = BlogPosts::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query blog post")?;

        Ok(row.map(post_view))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPostView>> {
        let row = BlogPosts::find()
            .filter(blog_posts::Column::Slug.eq(slug))
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query blog post by slug")?;

        Ok(row.map(post_view))
    }

    /// Whether a post other than `except_id` already uses `slug`.
    pub async fn slug_taken(&self, slug: &str, except_id: Option<&str>) -> Result<bool> {
        let mut query = BlogPosts::find().filter(blog_posts::Column::Slug.eq(slug));
        if let Some(id) = except_id {
            query = query.filter(blog_posts::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check blog slug")?;
        Ok(count > 0)
    }

    pub async fn create(&self, input: BlogPostInput, author_id: &str) -> Result<BlogPostView> {
        let now = timestamp();
        let mut active = blog_posts::ActiveModel {
            id: Set(new_id()),
            likes: Set(0),
            views: Set(0),
            author_id: Set(Some(author_id.to_string())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        input.apply_to(&mut active);

        let post = active
            .insert(&self.conn)
            .await
            .context("Failed to insert blog post")?;

        self.get(&post.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Blog post {} vanished after insert", post.id))
    }

    /// Replaces the editable fields. Counters and author are kept.
    pub async fn update(&self, id: &str, input: BlogPostInput) -> Result<Option<BlogPostView>> {
        let Some(existing) = BlogPosts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query blog post")?
        else {
            return Ok(None);
        };

        let mut active: blog_posts::ActiveModel = existing.into();
        input.apply_to(&mut active);
        active.updated_at = Set(timestamp());
        active
            .update(&self.conn)
            .await
            .context("Failed to update blog post")?;

        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = BlogPosts::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete blog post")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn increment_views(&self, id: &str) -> Result<bool> {
        let result = BlogPosts::update_many()
            .col_expr(
                blog_posts::Column::Views,
                Expr::col(blog_posts::Column::Views).add(1),
            )
            .filter(blog_posts::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to increment blog post views")?;
        Ok(result.rows_affected > 0)
    }

    /// Returns the new like count, or `None` for an unknown post.
    pub async fn increment_likes(&self, id: &str) -> Result<Option<i32>> {
        let result = BlogPosts::update_many()
            .col_expr(
                blog_posts::Column::Likes,
                Expr::col(blog_posts::Column::Likes).add(1),
            )
            .filter(blog_posts::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to increment blog post likes")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let post = BlogPosts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query blog post")?;
        Ok(post.map(|p| p.likes))
    }
}
