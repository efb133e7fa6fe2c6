use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

use repositories::{
    achievement::AchievementRepository, blog::BlogRepository,
    certification::CertificationRepository, comment::CommentRepository,
    contact::ContactRepository, contest::ContestRepository, education::EducationRepository,
    employment::EmploymentRepository, faq::FaqRepository,
    forum::{ForumPostRepository, ForumReplyRepository},
    portfolio::PortfolioRepository, project::ProjectRepository, skill::SkillRepository,
    social_link::SocialLinkRepository, user::UserRepository,
};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn portfolio_sections(&self) -> PortfolioRepository {
        PortfolioRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn blog_posts(&self) -> BlogRepository {
        BlogRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn comments(&self) -> CommentRepository {
        CommentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn forum_posts(&self) -> ForumPostRepository {
        ForumPostRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn forum_replies(&self) -> ForumReplyRepository {
        ForumReplyRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn contests(&self) -> ContestRepository {
        ContestRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn faqs(&self) -> FaqRepository {
        FaqRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn contact_messages(&self) -> ContactRepository {
        ContactRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn employment(&self) -> EmploymentRepository {
        EmploymentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn projects(&self) -> ProjectRepository {
        ProjectRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn certifications(&self) -> CertificationRepository {
        CertificationRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn skills(&self) -> SkillRepository {
        SkillRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn achievements(&self) -> AchievementRepository {
        AchievementRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn education(&self) -> EducationRepository {
        EducationRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn social_links(&self) -> SocialLinkRepository {
        SocialLinkRepository::new(self.conn.clone())
    }
}
