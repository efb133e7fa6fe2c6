use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "employment_experience")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub achievements: Json,
    #[sea_orm(column_type = "Json")]
    pub technologies: Json,
    #[sea_orm(column_type = "Json")]
    pub responsibilities: Json,
    /// Banking, SaaS, ...
    pub domain: Option<String>,
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
