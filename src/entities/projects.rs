use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub company: Option<String>,
    pub client: Option<String>,
    pub domain: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub technologies: Json,
    /// Agile, Scrum, ...
    pub methodology: Option<String>,
    pub team_size: Option<String>,
    pub duration: Option<String>,
    pub role: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub achievements: Json,
    #[sea_orm(column_type = "Json")]
    pub challenges: Json,
    #[sea_orm(column_type = "Json")]
    pub outcomes: Json,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_visible: bool,
    pub is_featured: bool,
    pub sort_order: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
