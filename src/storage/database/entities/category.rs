use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Content category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cms_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub category_id: i32,

    pub parent_id: Option<i32>,

    #[sea_orm(unique)]
    pub category_name: String,

    #[sea_orm(unique)]
    pub category_key: String,

    /// Materialized ancestor chain ending in the own id, e.g. `1/4/9`
    pub path: String,

    pub description: Option<String>,

    pub icon: Option<String>,

    pub sort_order: i32,

    pub is_visible: bool,

    /// Maintained by the article side, read-only here
    pub article_count: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
