use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Referenced tables first
        create(manager, &schema, Users).await?;
        create(manager, &schema, BlogPosts).await?;
        create(manager, &schema, Comments).await?;
        create(manager, &schema, ForumPosts).await?;
        create(manager, &schema, ForumReplies).await?;

        create(manager, &schema, PortfolioSections).await?;
        create(manager, &schema, Contests).await?;
        create(manager, &schema, Faqs).await?;
        create(manager, &schema, ContactMessages).await?;

        create(manager, &schema, EmploymentExperience).await?;
        create(manager, &schema, Education).await?;
        create(manager, &schema, Skills).await?;
        create(manager, &schema, Projects).await?;
        create(manager, &schema, Certifications).await?;
        create(manager, &schema, Achievements).await?;
        create(manager, &schema, SocialLinks).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SocialLinks).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Achievements).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Certifications).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Education).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmploymentExperience).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContactMessages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Faqs).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contests).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioSections).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumReplies).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumPosts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BlogPosts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
