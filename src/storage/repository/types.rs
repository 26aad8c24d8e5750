//! Inputs and outputs of the repository traits

use crate::core::models::PermissionType;
use serde::{Deserialize, Serialize};

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u64 = 100;

/// One-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub page_size: u64,
}

impl Page {
    /// Clamp to `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE`
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// A page of rows plus the total row count of the query
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Fields of a permission to insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPermission {
    pub perm_name: String,
    pub perm_key: String,
    pub perm_type: PermissionType,
    #[serde(default)]
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub api_path: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Partial permission update; absent fields are left untouched.
///
/// `parent_id: Some(0)` moves the permission to the root level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionPatch {
    pub perm_name: Option<String>,
    pub perm_key: Option<String>,
    pub perm_type: Option<PermissionType>,
    pub parent_id: Option<i32>,
    pub path: Option<String>,
    pub component: Option<String>,
    pub icon: Option<String>,
    pub api_path: Option<String>,
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
    pub is_enabled: Option<bool>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionFilter {
    /// Substring of the name
    pub perm_name: Option<String>,
    /// Substring of the key
    pub perm_key: Option<String>,
    pub perm_type: Option<PermissionType>,
    pub parent_id: Option<i32>,
    pub is_enabled: Option<bool>,
}

/// Fields of a role to insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    pub role_name: String,
    pub role_key: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePatch {
    pub role_name: Option<String>,
    pub role_key: Option<String>,
    pub sort_order: Option<i32>,
    pub is_enabled: Option<bool>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleFilter {
    pub role_name: Option<String>,
    pub role_key: Option<String>,
    pub is_enabled: Option<bool>,
}

/// Fields of a user to insert; the password is already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    pub username: Option<String>,
    pub is_enabled: Option<bool>,
}

/// Fields of a category to insert; the path is computed on write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub category_name: String,
    pub category_key: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

/// Partial category update; `parent_id: Some(0)` moves the category to the root level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPatch {
    pub category_name: Option<String>,
    pub category_key: Option<String>,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryFilter {
    pub category_name: Option<String>,
    pub parent_id: Option<i32>,
    pub is_visible: Option<bool>,
}

fn default_true() -> bool {
    true
}
