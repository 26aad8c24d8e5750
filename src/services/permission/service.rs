use crate::auth::rbac::validate_descriptor;
use crate::core::models::{
    Permission, PermissionType, SUPER_ADMIN_ROLE_ID, SelectOption, normalize_parent,
};
use crate::core::tree::{TreeNode, build_tree, creates_cycle};
use crate::storage::repository::{
    NewPermission, Page, Paged, PermissionFilter, PermissionPatch, PermissionRepository,
};
use crate::utils::error::{BlogError, Result};
use crate::utils::validation;
use std::sync::Arc;
use tracing::{debug, info};

/// Permission administration
#[derive(Clone)]
pub struct PermissionService {
    permissions: Arc<dyn PermissionRepository>,
}

impl PermissionService {
    pub fn new(permissions: Arc<dyn PermissionRepository>) -> Self {
        Self { permissions }
    }

    async fn require(&self, perm_id: i32) -> Result<Permission> {
        self.permissions
            .find_by_id(perm_id)
            .await?
            .ok_or_else(|| BlogError::not_found(format!("Permission {} not found", perm_id)))
    }

    async fn ensure_parent_exists(&self, parent_id: i32) -> Result<()> {
        if self.permissions.find_by_id(parent_id).await?.is_none() {
            return Err(BlogError::validation(format!(
                "Parent permission {} does not exist",
                parent_id
            )));
        }
        Ok(())
    }

    async fn ensure_key_free(&self, perm_key: &str, except: Option<i32>) -> Result<()> {
        if let Some(existing) = self.permissions.find_by_key(perm_key).await? {
            if Some(existing.perm_id) != except {
                return Err(BlogError::conflict(format!(
                    "Permission key {} already exists",
                    perm_key
                )));
            }
        }
        Ok(())
    }

    /// Api permissions need a well-formed descriptor no other api permission uses
    async fn ensure_descriptor(&self, api_path: Option<&str>, except: Option<i32>) -> Result<()> {
        let raw = api_path.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
            BlogError::validation("Api permissions require an access descriptor")
        })?;
        validate_descriptor(raw)?;

        if let Some(existing) = self.permissions.find_api_by_descriptor(raw).await? {
            if Some(existing.perm_id) != except {
                return Err(BlogError::conflict(format!(
                    "Access descriptor {} is already used by permission {}",
                    raw, existing.perm_id
                )));
            }
        }
        Ok(())
    }

    pub async fn create(&self, mut new: NewPermission) -> Result<Permission> {
        new.perm_name = validation::required("perm_name", &new.perm_name)?;
        new.perm_key = validation::required("perm_key", &new.perm_key)?;
        validation::key("perm_key", &new.perm_key)?;

        self.ensure_key_free(&new.perm_key, None).await?;
        if new.perm_type == PermissionType::Api {
            self.ensure_descriptor(new.api_path.as_deref(), None).await?;
        }

        new.parent_id = normalize_parent(new.parent_id);
        if let Some(parent_id) = new.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        let permission = self.permissions.create(new).await?;
        info!(
            perm_id = permission.perm_id,
            perm_key = %permission.perm_key,
            "Permission created"
        );
        Ok(permission)
    }

    pub async fn update(&self, perm_id: i32, mut patch: PermissionPatch) -> Result<Permission> {
        let existing = self.require(perm_id).await?;

        if let Some(name) = &patch.perm_name {
            patch.perm_name = Some(validation::required("perm_name", name)?);
        }
        if let Some(key) = &patch.perm_key {
            let key = validation::required("perm_key", key)?;
            validation::key("perm_key", &key)?;
            self.ensure_key_free(&key, Some(perm_id)).await?;
            patch.perm_key = Some(key);
        }

        let perm_type = patch.perm_type.unwrap_or(existing.perm_type);
        if perm_type == PermissionType::Api
            && (patch.perm_type.is_some() || patch.api_path.is_some())
        {
            let api_path = patch.api_path.as_deref().or(existing.api_path.as_deref());
            self.ensure_descriptor(api_path, Some(perm_id)).await?;
        }

        if let Some(parent_id) = normalize_parent(patch.parent_id) {
            self.ensure_parent_exists(parent_id).await?;
            let all = self.permissions.list_all(false).await?;
            if creates_cycle(&all, perm_id, parent_id) {
                return Err(BlogError::validation(format!(
                    "Permission {} cannot be moved under itself or one of its descendants",
                    perm_id
                )));
            }
        }

        let permission = self.permissions.update(perm_id, patch).await?;
        info!(perm_id, "Permission updated");
        Ok(permission)
    }

    pub async fn get(&self, perm_id: i32) -> Result<Permission> {
        self.require(perm_id).await
    }

    pub async fn list(&self, filter: PermissionFilter, page: Page) -> Result<Paged<Permission>> {
        self.permissions.list(filter, page).await
    }

    pub async fn set_enabled(&self, perm_id: i32, enabled: bool) -> Result<()> {
        self.require(perm_id).await?;
        self.permissions.set_enabled(perm_id, enabled).await?;
        info!(perm_id, enabled, "Permission status changed");
        Ok(())
    }

    pub async fn delete(&self, perm_id: i32) -> Result<()> {
        let existing = self.require(perm_id).await?;

        if existing.is_builtin {
            return Err(BlogError::forbidden("Built-in permissions cannot be deleted"));
        }
        if self.permissions.count_children(perm_id).await? > 0 {
            return Err(BlogError::conflict(
                "Permission has child permissions, delete them first",
            ));
        }
        if self.permissions.count_role_bindings(perm_id).await? > 0 {
            return Err(BlogError::conflict(
                "Permission is still bound to roles, unbind it first",
            ));
        }

        self.permissions.delete(perm_id).await?;
        info!(perm_id, "Permission deleted");
        Ok(())
    }

    /// Every permission as a tree, ordered by `sort_order, perm_id`
    pub async fn tree(&self) -> Result<Vec<TreeNode<Permission>>> {
        let all = self.permissions.list_all(false).await?;
        Ok(build_tree(all))
    }

    /// Navigation tree of the menus and buttons the caller's roles grant
    pub async fn menu_tree_for_roles(&self, role_ids: &[i32]) -> Result<Vec<TreeNode<Permission>>> {
        let permissions = if role_ids.contains(&SUPER_ADMIN_ROLE_ID) {
            self.permissions
                .list_all(true)
                .await?
                .into_iter()
                .filter(|p| p.perm_type.is_navigation())
                .collect()
        } else {
            self.permissions
                .list_for_roles(role_ids, &[PermissionType::Menu, PermissionType::Button])
                .await?
        };

        debug!(?role_ids, count = permissions.len(), "Building menu tree");
        Ok(build_tree(permissions))
    }

    /// Enabled permissions as select options
    pub async fn options(&self) -> Result<Vec<SelectOption>> {
        Ok(self
            .permissions
            .list_all(true)
            .await?
            .into_iter()
            .map(|p| SelectOption {
                label: p.perm_name,
                value: p.perm_id,
            })
            .collect())
    }
}
