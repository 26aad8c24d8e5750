use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sys_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub perm_id: i32,

    pub perm_name: String,

    /// Stable key, unique across all permissions
    #[sea_orm(unique)]
    pub perm_key: String,

    /// 1 = menu, 2 = button, 3 = api
    pub perm_type: i32,

    /// Parent permission, `None` for roots
    pub parent_id: Option<i32>,

    /// Front-end route
    pub path: Option<String>,

    pub component: Option<String>,

    pub icon: Option<String>,

    /// Access descriptor `METHOD:path_pattern` for api permissions
    pub api_path: Option<String>,

    pub sort_order: i32,

    pub is_visible: bool,

    pub is_enabled: bool,

    pub is_builtin: bool,

    pub remark: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// Permission entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_permission::Entity")]
    RolePermission,
}

impl Related<super::role_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePermission.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_permission::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::role_permission::Relation::Permission.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
