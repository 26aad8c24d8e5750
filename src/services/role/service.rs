use crate::core::models::{Role, RoleDetail, SelectOption};
use crate::storage::repository::{
    NewRole, Page, Paged, PermissionRepository, RoleFilter, RolePatch, RoleRepository,
};
use crate::utils::error::{BlogError, Result};
use crate::utils::validation;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Role administration
#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
}

/// Sorted and deduplicated copy of `ids`
pub(crate) fn unique_ids(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>, permissions: Arc<dyn PermissionRepository>) -> Self {
        Self { roles, permissions }
    }

    async fn require(&self, role_id: i32) -> Result<Role> {
        self.roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| BlogError::not_found(format!("Role {} not found", role_id)))
    }

    async fn ensure_name_free(&self, role_name: &str, except: Option<i32>) -> Result<()> {
        match self.roles.find_by_name(role_name).await? {
            Some(existing) if Some(existing.role_id) != except => Err(BlogError::conflict(
                format!("Role name {} already exists", role_name),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_key_free(&self, role_key: &str, except: Option<i32>) -> Result<()> {
        match self.roles.find_by_key(role_key).await? {
            Some(existing) if Some(existing.role_id) != except => Err(BlogError::conflict(
                format!("Role key {} already exists", role_key),
            )),
            _ => Ok(()),
        }
    }

    pub async fn create(&self, mut new: NewRole) -> Result<Role> {
        new.role_name = validation::required("role_name", &new.role_name)?;
        new.role_key = validation::required("role_key", &new.role_key)?;
        validation::key("role_key", &new.role_key)?;

        self.ensure_name_free(&new.role_name, None).await?;
        self.ensure_key_free(&new.role_key, None).await?;

        let role = self.roles.create(new).await?;
        info!(role_id = role.role_id, role_key = %role.role_key, "Role created");
        Ok(role)
    }

    pub async fn update(&self, role_id: i32, mut patch: RolePatch) -> Result<Role> {
        let existing = self.require(role_id).await?;

        if existing.is_super_admin() && patch.is_enabled == Some(false) {
            return Err(BlogError::forbidden("The super administrator role cannot be disabled"));
        }
        if let Some(name) = &patch.role_name {
            let name = validation::required("role_name", name)?;
            self.ensure_name_free(&name, Some(role_id)).await?;
            patch.role_name = Some(name);
        }
        if let Some(key) = &patch.role_key {
            let key = validation::required("role_key", key)?;
            validation::key("role_key", &key)?;
            if existing.is_builtin && key != existing.role_key {
                return Err(BlogError::forbidden("Built-in role keys cannot be changed"));
            }
            self.ensure_key_free(&key, Some(role_id)).await?;
            patch.role_key = Some(key);
        }

        let role = self.roles.update(role_id, patch).await?;
        info!(role_id, "Role updated");
        Ok(role)
    }

    /// Role with its bound permission ids
    pub async fn get(&self, role_id: i32) -> Result<RoleDetail> {
        let role = self.require(role_id).await?;
        let permission_ids = self.roles.permission_ids(role_id).await?;
        Ok(RoleDetail {
            role,
            permission_ids,
        })
    }

    pub async fn list(&self, filter: RoleFilter, page: Page) -> Result<Paged<Role>> {
        self.roles.list(filter, page).await
    }

    pub async fn options(&self) -> Result<Vec<SelectOption>> {
        Ok(self
            .roles
            .list_enabled()
            .await?
            .into_iter()
            .map(|r| SelectOption {
                label: r.role_name,
                value: r.role_id,
            })
            .collect())
    }

    pub async fn set_enabled(&self, role_id: i32, enabled: bool) -> Result<()> {
        let existing = self.require(role_id).await?;
        if existing.is_super_admin() && !enabled {
            return Err(BlogError::forbidden("The super administrator role cannot be disabled"));
        }
        self.roles.set_enabled(role_id, enabled).await?;
        info!(role_id, enabled, "Role status changed");
        Ok(())
    }

    pub async fn delete(&self, role_id: i32) -> Result<()> {
        let existing = self.require(role_id).await?;

        if existing.is_builtin || existing.is_super_admin() {
            return Err(BlogError::forbidden("Built-in roles cannot be deleted"));
        }
        let users = self.roles.count_users(role_id).await?;
        if users > 0 {
            return Err(BlogError::conflict(format!(
                "Role is still assigned to {} user(s)",
                users
            )));
        }

        self.roles.delete(role_id).await?;
        info!(role_id, "Role deleted");
        Ok(())
    }

    pub async fn permission_ids(&self, role_id: i32) -> Result<Vec<i32>> {
        self.require(role_id).await?;
        self.roles.permission_ids(role_id).await
    }

    /// Replace the role's permission set; every id must name an existing permission
    pub async fn assign_permissions(&self, role_id: i32, perm_ids: &[i32]) -> Result<Vec<i32>> {
        self.require(role_id).await?;

        let perm_ids = unique_ids(perm_ids);
        if !perm_ids.is_empty() {
            let found: BTreeSet<i32> = self
                .permissions
                .find_by_ids(&perm_ids)
                .await?
                .into_iter()
                .map(|p| p.perm_id)
                .collect();
            let missing: Vec<i32> = perm_ids
                .iter()
                .copied()
                .filter(|id| !found.contains(id))
                .collect();
            if !missing.is_empty() {
                warn!(role_id, ?missing, "Rejected unknown permission ids");
                return Err(BlogError::validation(format!(
                    "Unknown permission ids: {:?}",
                    missing
                )));
            }
        }

        self.roles.replace_permissions(role_id, &perm_ids).await?;
        info!(role_id, count = perm_ids.len(), "Role permissions replaced");
        Ok(perm_ids)
    }
}
