//! Storage capability interfaces
//!
//! Services and the RBAC check hold these as `Arc<dyn ...>` so tests can swap in
//! mocks. [`crate::storage::database::Database`] implements all of them.

mod types;

pub use types::*;

use crate::core::models::{ApiGrant, Category, Permission, PermissionType, Role, User};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Permission rows and their role bindings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn create(&self, new: NewPermission) -> Result<Permission>;

    /// Apply `patch`; `NotFound` when the row is missing
    async fn update(&self, perm_id: i32, patch: PermissionPatch) -> Result<Permission>;

    async fn find_by_id(&self, perm_id: i32) -> Result<Option<Permission>>;

    async fn find_by_key(&self, perm_key: &str) -> Result<Option<Permission>>;

    /// The api permission carrying exactly this access descriptor
    async fn find_api_by_descriptor(&self, descriptor: &str) -> Result<Option<Permission>>;

    async fn find_by_ids(&self, perm_ids: &[i32]) -> Result<Vec<Permission>>;

    /// Ordered by `sort_order, perm_id`
    async fn list(&self, filter: PermissionFilter, page: Page) -> Result<Paged<Permission>>;

    /// Every permission ordered by `sort_order, perm_id`
    async fn list_all(&self, enabled_only: bool) -> Result<Vec<Permission>>;

    /// Enabled permissions of the given types bound to any enabled role in `role_ids`,
    /// ordered by `sort_order, perm_id`
    async fn list_for_roles(
        &self,
        role_ids: &[i32],
        types: &[PermissionType],
    ) -> Result<Vec<Permission>>;

    /// Enabled api permissions with a non-empty descriptor bound to any enabled role
    /// in `role_ids`
    async fn api_grants_for_roles(&self, role_ids: &[i32]) -> Result<Vec<ApiGrant>>;

    async fn count_children(&self, perm_id: i32) -> Result<u64>;

    async fn count_role_bindings(&self, perm_id: i32) -> Result<u64>;

    async fn set_enabled(&self, perm_id: i32, enabled: bool) -> Result<()>;

    async fn delete(&self, perm_id: i32) -> Result<()>;
}

/// Role rows and their permission bindings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, new: NewRole) -> Result<Role>;

    async fn update(&self, role_id: i32, patch: RolePatch) -> Result<Role>;

    async fn find_by_id(&self, role_id: i32) -> Result<Option<Role>>;

    async fn find_by_key(&self, role_key: &str) -> Result<Option<Role>>;

    async fn find_by_name(&self, role_name: &str) -> Result<Option<Role>>;

    async fn find_by_ids(&self, role_ids: &[i32]) -> Result<Vec<Role>>;

    /// Ordered by `sort_order, role_id`
    async fn list(&self, filter: RoleFilter, page: Page) -> Result<Paged<Role>>;

    async fn list_enabled(&self) -> Result<Vec<Role>>;

    async fn set_enabled(&self, role_id: i32, enabled: bool) -> Result<()>;

    /// Remove the role and its permission links in one transaction
    async fn delete(&self, role_id: i32) -> Result<()>;

    async fn count_users(&self, role_id: i32) -> Result<u64>;

    async fn permission_ids(&self, role_id: i32) -> Result<Vec<i32>>;

    /// Atomically replace the role's permission set
    async fn replace_permissions(&self, role_id: i32, perm_ids: &[i32]) -> Result<()>;
}

/// User rows and their role bindings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user and its role links in one transaction
    async fn create(&self, new: NewUser, role_ids: &[i32]) -> Result<User>;

    async fn update(&self, user_id: i32, patch: UserPatch) -> Result<User>;

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Ordered by `user_id`
    async fn list(&self, filter: UserFilter, page: Page) -> Result<Paged<User>>;

    async fn set_enabled(&self, user_id: i32, enabled: bool) -> Result<()>;

    async fn touch_last_login(&self, user_id: i32) -> Result<()>;

    /// Store a new password hash; `NotFound` when the row is missing
    async fn set_password_hash(&self, user_id: i32, password_hash: &str) -> Result<()>;

    /// Ids of every role linked to the user, ascending
    async fn role_ids(&self, user_id: i32) -> Result<Vec<i32>>;

    /// Atomically replace the user's role set
    async fn replace_roles(&self, user_id: i32, role_ids: &[i32]) -> Result<()>;

    /// Remove the user and its role links in one transaction
    async fn delete(&self, user_id: i32) -> Result<()>;
}

/// Category rows with materialized paths
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert and materialize the path from the parent's stored path in one transaction
    async fn create(&self, new: NewCategory) -> Result<Category>;

    /// Apply `patch`. A parent change recomputes the path and rewrites the path
    /// prefix of every descendant in the same transaction.
    async fn update(&self, category_id: i32, patch: CategoryPatch) -> Result<Category>;

    async fn find_by_id(&self, category_id: i32) -> Result<Option<Category>>;

    async fn find_by_key(&self, category_key: &str) -> Result<Option<Category>>;

    async fn find_by_name(&self, category_name: &str) -> Result<Option<Category>>;

    /// Ordered by `sort_order, category_id`
    async fn list(&self, filter: CategoryFilter, page: Page) -> Result<Paged<Category>>;

    /// Every category ordered by `sort_order, category_id`
    async fn list_all(&self, visible_only: bool) -> Result<Vec<Category>>;

    /// Categories whose path lies below `path`
    async fn find_descendants(&self, path: &str) -> Result<Vec<Category>>;

    async fn count_children(&self, category_id: i32) -> Result<u64>;

    async fn delete(&self, category_id: i32) -> Result<()>;
}
