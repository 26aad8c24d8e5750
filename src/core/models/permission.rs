//! Permission model

use super::normalize_parent;
use crate::core::tree::TreeItem;
use crate::storage::database::entities::permission;
use crate::utils::error::BlogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a permission node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum PermissionType {
    Menu = 1,
    Button = 2,
    Api = 3,
}

impl PermissionType {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Menu and button nodes make up the navigation tree
    pub fn is_navigation(self) -> bool {
        matches!(self, Self::Menu | Self::Button)
    }
}

impl From<PermissionType> for i32 {
    fn from(value: PermissionType) -> Self {
        value.code()
    }
}

impl TryFrom<i32> for PermissionType {
    type Error = BlogError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Menu),
            2 => Ok(Self::Button),
            3 => Ok(Self::Api),
            other => Err(BlogError::validation(format!(
                "Unknown permission type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => write!(f, "menu"),
            Self::Button => write!(f, "button"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// A node of the access-control and menu hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub perm_id: i32,
    pub perm_name: String,
    pub perm_key: String,
    pub perm_type: PermissionType,
    pub parent_id: Option<i32>,
    pub path: Option<String>,
    pub component: Option<String>,
    pub icon: Option<String>,
    /// Access descriptor, only meaningful for [`PermissionType::Api`]
    pub api_path: Option<String>,
    pub sort_order: i32,
    pub is_visible: bool,
    pub is_enabled: bool,
    pub is_builtin: bool,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<permission::Model> for Permission {
    type Error = BlogError;

    fn try_from(model: permission::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            perm_id: model.perm_id,
            perm_name: model.perm_name,
            perm_key: model.perm_key,
            perm_type: PermissionType::try_from(model.perm_type)?,
            parent_id: normalize_parent(model.parent_id),
            path: model.path,
            component: model.component,
            icon: model.icon,
            api_path: model.api_path,
            sort_order: model.sort_order,
            is_visible: model.is_visible,
            is_enabled: model.is_enabled,
            is_builtin: model.is_builtin,
            remark: model.remark,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

impl TreeItem for Permission {
    fn node_id(&self) -> i32 {
        self.perm_id
    }

    fn parent_node_id(&self) -> Option<i32> {
        self.parent_id
    }
}

/// An enabled api permission reachable through an enabled role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiGrant {
    pub perm_id: i32,
    /// Raw `METHOD:path_pattern` string as stored
    pub access_descriptor: String,
}
