//! Role model

use crate::storage::database::entities::role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role id that passes every authorization check
pub const SUPER_ADMIN_ROLE_ID: i32 = 1;

/// Role assigned to self-registered users
pub const DEFAULT_ROLE_ID: i32 = 2;

/// Role key of the built-in administrator role
pub const ADMIN_ROLE_KEY: &str = "admin";

/// Named bundle of permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i32,
    pub role_name: String,
    pub role_key: String,
    pub sort_order: i32,
    pub is_enabled: bool,
    pub is_builtin: bool,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn is_super_admin(&self) -> bool {
        self.role_id == SUPER_ADMIN_ROLE_ID
    }
}

impl From<role::Model> for Role {
    fn from(model: role::Model) -> Self {
        Self {
            role_id: model.role_id,
            role_name: model.role_name,
            role_key: model.role_key,
            sort_order: model.sort_order,
            is_enabled: model.is_enabled,
            is_builtin: model.is_builtin,
            remark: model.remark,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Role with the ids of its bound permissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub permission_ids: Vec<i32>,
}
