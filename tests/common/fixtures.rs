//! Test fixtures and data factories
//!
//! Plain input structs with sensible defaults; tests override single fields.

use blog_rs::core::models::PermissionType;
use blog_rs::storage::repository::{NewCategory, NewPermission, NewRole, NewUser};

pub fn permission(perm_key: &str, perm_type: PermissionType, parent_id: Option<i32>) -> NewPermission {
    NewPermission {
        perm_name: format!("Permission {}", perm_key),
        perm_key: perm_key.to_string(),
        perm_type,
        parent_id,
        path: None,
        component: None,
        icon: None,
        api_path: None,
        sort_order: 0,
        is_visible: true,
        is_enabled: true,
        remark: None,
    }
}

pub fn menu(perm_key: &str, parent_id: Option<i32>) -> NewPermission {
    permission(perm_key, PermissionType::Menu, parent_id)
}

pub fn api_permission(perm_key: &str, descriptor: &str) -> NewPermission {
    NewPermission {
        api_path: Some(descriptor.to_string()),
        ..permission(perm_key, PermissionType::Api, None)
    }
}

pub fn role(role_key: &str) -> NewRole {
    NewRole {
        role_name: format!("Role {}", role_key),
        role_key: role_key.to_string(),
        sort_order: 0,
        is_enabled: true,
        remark: None,
    }
}

/// User row with an already hashed placeholder password
pub fn user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        email: Some(format!("{}@example.com", username)),
        nickname: None,
        avatar: None,
        is_enabled: true,
    }
}

pub fn category(category_key: &str, parent_id: Option<i32>) -> NewCategory {
    NewCategory {
        category_name: format!("Category {}", category_key),
        category_key: category_key.to_string(),
        parent_id,
        description: None,
        icon: None,
        sort_order: 0,
        is_visible: true,
    }
}
